//! Async driver for an [`UploadSession`].
//!
//! Preview reads and analysis requests run as tokio tasks. The session lock is
//! never held across an `.await`; completions re-acquire it and are applied only
//! when their ticket still matches the current selection. Every applied change
//! is published on a `watch` channel, so discarded completions are never visible.

use std::sync::Arc;

use stegoshield_api_client::Classifier;
use stegoshield_core::{AnalysisResult, MediaCategory, SelectedFile, WorkflowError};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::preview::render_preview;
use crate::reader::{LocalReader, MediaReader};
use crate::session::{SessionSnapshot, Ticket, UploadSession};

/// One live upload workflow (one file at a time).
#[derive(Clone)]
pub struct UploadWorkflow {
    session_id: Uuid,
    session: Arc<Mutex<UploadSession>>,
    state: Arc<watch::Sender<SessionSnapshot>>,
    classifier: Arc<dyn Classifier>,
    reader: Arc<dyn MediaReader>,
}

/// Result of a selection: the derived category plus the pending preview read, if any.
#[derive(Debug)]
pub struct Selection {
    pub generation: u64,
    pub media_category: MediaCategory,
    preview: Option<JoinHandle<bool>>,
}

impl Selection {
    /// Whether a preview read was started for this selection.
    pub fn has_pending_preview(&self) -> bool {
        self.preview.is_some()
    }

    /// Wait for the preview read. Returns true when its handle was applied, false
    /// when there was nothing to read or a newer selection made it stale.
    pub async fn preview_applied(self) -> bool {
        match self.preview {
            Some(handle) => handle.await.unwrap_or(false),
            None => false,
        }
    }

    /// Abort the preview read. Use when the caller never displays the preview.
    pub fn cancel_preview(self) {
        if let Some(handle) = self.preview {
            handle.abort();
        }
    }
}

/// An analysis request running in the background.
///
/// Dropping the task does not cancel the request; its outcome is still applied
/// to the session.
pub struct AnalysisTask {
    ticket: Ticket,
    handle: JoinHandle<Result<AnalysisResult, WorkflowError>>,
}

impl AnalysisTask {
    pub fn generation(&self) -> u64 {
        self.ticket.generation()
    }

    /// Wait for the request to finish.
    pub async fn wait(self) -> Result<AnalysisResult, WorkflowError> {
        self.handle.await.unwrap_or_else(|join_err| {
            Err(WorkflowError::analysis_failed(anyhow::anyhow!(
                "Analysis task failed: {}",
                join_err
            )))
        })
    }
}

impl UploadWorkflow {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self::with_reader(classifier, Arc::new(LocalReader))
    }

    pub fn with_reader(classifier: Arc<dyn Classifier>, reader: Arc<dyn MediaReader>) -> Self {
        let session = UploadSession::new();
        let (state, _) = watch::channel(session.snapshot());
        let session_id = Uuid::new_v4();

        tracing::debug!(session_id = %session_id, "Upload workflow created");

        Self {
            session_id,
            session: Arc::new(Mutex::new(session)),
            state: Arc::new(state),
            classifier,
            reader,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current read-only state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Select a new file, replacing the previous one.
    ///
    /// Clears any previous verdict and starts a background preview read for
    /// supported categories. Unknown categories get an empty preview and no read.
    pub async fn select(&self, file: SelectedFile) -> Selection {
        let (ticket, media_category) = {
            let mut session = self.session.lock().await;
            let ticket = session.select(file.clone());
            self.state.send_replace(session.snapshot());
            (ticket, session.media_category())
        };

        tracing::info!(
            session_id = %self.session_id,
            generation = ticket.generation(),
            file_name = %file.name(),
            content_type = file.content_type().unwrap_or("<none>"),
            media_category = %media_category,
            "File selected"
        );

        let preview = media_category.is_previewable().then(|| {
            let workflow = self.clone();
            tokio::spawn(async move { workflow.load_preview(ticket, file).await })
        });

        Selection {
            generation: ticket.generation(),
            media_category,
            preview,
        }
    }

    /// Drop the selection, its preview and any verdict.
    pub async fn reset(&self) {
        let mut session = self.session.lock().await;
        session.reset();
        self.state.send_replace(session.snapshot());
        tracing::debug!(
            session_id = %self.session_id,
            generation = session.generation(),
            "Session reset"
        );
    }

    /// Start analyzing the selected file in the background.
    ///
    /// Precondition failures (`NoFileSelected`, `AnalysisInFlight`) are returned
    /// immediately and no request is issued.
    pub async fn start_analysis(&self) -> Result<AnalysisTask, WorkflowError> {
        let (ticket, file) = {
            let mut session = self.session.lock().await;
            let started = session.begin_analysis()?;
            self.state.send_replace(session.snapshot());
            started
        };

        tracing::info!(
            session_id = %self.session_id,
            generation = ticket.generation(),
            file_name = %file.name(),
            "Submitting file for analysis"
        );

        let workflow = self.clone();
        let handle = tokio::spawn(async move {
            // The request runs in its own task so a panicking classifier still
            // releases the in-flight slot.
            let request = {
                let workflow = workflow.clone();
                tokio::spawn(async move { workflow.request_analysis(&file).await })
            };
            let outcome = request.await.unwrap_or_else(|join_err| {
                Err(anyhow::anyhow!("Analysis request failed: {}", join_err))
            });
            workflow.finish_analysis(ticket, outcome).await
        });

        Ok(AnalysisTask { ticket, handle })
    }

    /// Analyze the selected file and wait for the verdict.
    pub async fn analyze(&self) -> Result<AnalysisResult, WorkflowError> {
        self.start_analysis().await?.wait().await
    }

    async fn load_preview(&self, ticket: Ticket, file: SelectedFile) -> bool {
        let handle = render_preview(self.reader.as_ref(), &file).await;

        let mut session = self.session.lock().await;
        if session.apply_preview(ticket, handle) {
            self.state.send_replace(session.snapshot());
            true
        } else {
            tracing::debug!(
                session_id = %self.session_id,
                generation = ticket.generation(),
                current_generation = session.generation(),
                "Discarding stale preview"
            );
            false
        }
    }

    async fn request_analysis(&self, file: &SelectedFile) -> anyhow::Result<AnalysisResult> {
        let data = self.reader.read(file).await.map_err(|err| {
            anyhow::Error::new(err).context(format!("Failed to read file: {}", file.name()))
        })?;

        self.classifier
            .classify(file.name(), file.content_type(), data)
            .await
    }

    async fn finish_analysis(
        &self,
        ticket: Ticket,
        outcome: anyhow::Result<AnalysisResult>,
    ) -> Result<AnalysisResult, WorkflowError> {
        let mut session = self.session.lock().await;
        let result = session.complete_analysis(ticket, outcome);

        match &result {
            Ok(analysis) => {
                self.state.send_replace(session.snapshot());
                tracing::info!(
                    session_id = %self.session_id,
                    generation = ticket.generation(),
                    verdict = %analysis.verdict,
                    confidence = analysis.confidence,
                    "Analysis completed"
                );
            }
            Err(WorkflowError::Superseded) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    generation = ticket.generation(),
                    current_generation = session.generation(),
                    "Discarding analysis result for a replaced selection"
                );
            }
            Err(err) => {
                self.state.send_replace(session.snapshot());
                tracing::warn!(
                    session_id = %self.session_id,
                    generation = ticket.generation(),
                    error = %err,
                    "Analysis failed"
                );
            }
        }

        result
    }
}
