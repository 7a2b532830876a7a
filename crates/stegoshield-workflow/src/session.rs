//! Upload session state.
//!
//! A plain value type holding the one live selection and everything derived from
//! it. It performs no I/O; asynchronous work is issued against a [`Ticket`] and
//! handed back through [`UploadSession::apply_preview`] and
//! [`UploadSession::complete_analysis`], which drop anything issued for an
//! older selection.

use serde::Serialize;
use stegoshield_core::{AnalysisResult, MediaCategory, SelectedFile, WorkflowError};

use crate::preview::PreviewHandle;

/// Identifies the selection an asynchronous operation was started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Read-only view of the session published to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub generation: u64,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub media_category: MediaCategory,
    pub preview_handle: PreviewHandle,
    pub analysis_result: Option<AnalysisResult>,
    pub analysis_pending: bool,
}

#[derive(Debug, Default)]
pub struct UploadSession {
    generation: u64,
    selected_file: Option<SelectedFile>,
    media_category: MediaCategory,
    preview_handle: PreviewHandle,
    analysis_result: Option<AnalysisResult>,
    // Generation of the selection whose analysis request is outstanding.
    analysis_pending: Option<u64>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection wholesale.
    ///
    /// Derives the media category, clears the preview and any previous verdict,
    /// and invalidates every outstanding preview read or analysis request.
    pub fn select(&mut self, file: SelectedFile) -> Ticket {
        self.generation += 1;
        self.media_category = file.media_category();
        self.selected_file = Some(file);
        self.preview_handle = PreviewHandle::empty();
        self.analysis_result = None;
        self.analysis_pending = None;

        self.ticket()
    }

    /// Drop the selection and everything derived from it.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.selected_file = None;
        self.media_category = MediaCategory::Unknown;
        self.preview_handle = PreviewHandle::empty();
        self.analysis_result = None;
        self.analysis_pending = None;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    /// Apply a finished preview read. Returns false when the ticket is stale and
    /// the handle was discarded.
    pub fn apply_preview(&mut self, ticket: Ticket, handle: PreviewHandle) -> bool {
        if !self.is_current(ticket) || self.selected_file.is_none() {
            return false;
        }
        self.preview_handle = handle;
        true
    }

    /// Check the analysis preconditions and mark a request as outstanding.
    ///
    /// Fails with `NoFileSelected` when nothing is selected and with
    /// `AnalysisInFlight` when a request for the current selection is pending.
    pub fn begin_analysis(&mut self) -> Result<(Ticket, SelectedFile), WorkflowError> {
        let file = self
            .selected_file
            .clone()
            .ok_or(WorkflowError::NoFileSelected)?;

        if self.analysis_pending == Some(self.generation) {
            return Err(WorkflowError::AnalysisInFlight);
        }

        self.analysis_pending = Some(self.generation);
        Ok((self.ticket(), file))
    }

    /// Apply the outcome of an analysis request.
    ///
    /// A stale ticket leaves the session untouched and yields `Superseded`. A
    /// failure leaves `analysis_result` absent.
    pub fn complete_analysis(
        &mut self,
        ticket: Ticket,
        outcome: anyhow::Result<AnalysisResult>,
    ) -> Result<AnalysisResult, WorkflowError> {
        if !self.is_current(ticket) {
            return Err(WorkflowError::Superseded);
        }

        self.analysis_pending = None;
        match outcome {
            Ok(result) => {
                self.analysis_result = Some(result.clone());
                Ok(result)
            }
            Err(err) => {
                self.analysis_result = None;
                Err(WorkflowError::analysis_failed(err))
            }
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn media_category(&self) -> MediaCategory {
        self.media_category
    }

    pub fn preview_handle(&self) -> &PreviewHandle {
        &self.preview_handle
    }

    pub fn analysis_result(&self) -> Option<&AnalysisResult> {
        self.analysis_result.as_ref()
    }

    pub fn is_analysis_pending(&self) -> bool {
        self.analysis_pending == Some(self.generation)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            file_name: self.selected_file.as_ref().map(|f| f.name().to_string()),
            content_type: self
                .selected_file
                .as_ref()
                .and_then(|f| f.content_type())
                .map(str::to_string),
            media_category: self.media_category,
            preview_handle: self.preview_handle.clone(),
            analysis_result: self.analysis_result.clone(),
            analysis_pending: self.is_analysis_pending(),
        }
    }

    fn ticket(&self) -> Ticket {
        Ticket {
            generation: self.generation,
        }
    }
}
