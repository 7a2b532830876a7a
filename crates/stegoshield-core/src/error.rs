//! Error types module
//!
//! This module provides the error taxonomy of the upload workflow. Every failure
//! leaves the session in a well-defined, retryable state; none of them is fatal.
//!
//! Unsupported media categories and failed preview reads are deliberately absent:
//! both degrade to an empty preview instead of producing an error.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes like discarded stale results
    Debug,
    /// Warning level - for user mistakes and recoverable failures
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata describing how an error should be presented to the user.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "NO_FILE_SELECTED")
    fn error_code(&self) -> &'static str;

    /// Whether the user can recover by acting again
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// User-facing message (may differ from the internal error message)
    fn client_message(&self) -> String;

    /// Whether the error should be shown to the user at all
    fn is_user_facing(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("No file selected")]
    NoFileSelected,

    #[error("An analysis is already in progress for the selected file")]
    AnalysisInFlight,

    #[error("Analysis failed: {message}")]
    AnalysisFailed {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Result discarded: the selection changed while the request was outstanding")]
    Superseded,
}

impl WorkflowError {
    /// Wrap a transport, status or decoding failure from the classification service.
    pub fn analysis_failed(source: anyhow::Error) -> Self {
        WorkflowError::AnalysisFailed {
            message: format!("{:#}", source),
            source,
        }
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, user_facing, log_level).
fn workflow_error_static_metadata(
    err: &WorkflowError,
) -> (&'static str, bool, Option<&'static str>, bool, LogLevel) {
    match err {
        WorkflowError::NoFileSelected => (
            "NO_FILE_SELECTED",
            true,
            Some("Upload a file first"),
            true,
            LogLevel::Warn,
        ),
        WorkflowError::AnalysisInFlight => (
            "ANALYSIS_IN_FLIGHT",
            true,
            Some("Wait for the current analysis to finish"),
            true,
            LogLevel::Debug,
        ),
        WorkflowError::AnalysisFailed { .. } => (
            "ANALYSIS_FAILED",
            true,
            Some("Check the classification service and try again"),
            true,
            LogLevel::Error,
        ),
        WorkflowError::Superseded => ("SUPERSEDED", false, None, false, LogLevel::Debug),
    }
}

impl ErrorMetadata for WorkflowError {
    fn error_code(&self) -> &'static str {
        workflow_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        workflow_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        workflow_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            WorkflowError::NoFileSelected => "Upload a file first!".to_string(),
            WorkflowError::AnalysisInFlight => "Analysis already running".to_string(),
            WorkflowError::AnalysisFailed { .. } => "Prediction failed".to_string(),
            WorkflowError::Superseded => "Result no longer applies".to_string(),
        }
    }

    fn is_user_facing(&self) -> bool {
        workflow_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        workflow_error_static_metadata(self).4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_no_file_selected() {
        let err = WorkflowError::NoFileSelected;
        assert_eq!(err.error_code(), "NO_FILE_SELECTED");
        assert!(err.is_recoverable());
        assert!(err.is_user_facing());
        assert_eq!(err.client_message(), "Upload a file first!");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_error_metadata_analysis_failed_keeps_source_chain() {
        let source = anyhow::anyhow!("connection refused").context("Failed to send request");
        let err = WorkflowError::analysis_failed(source);

        assert_eq!(err.error_code(), "ANALYSIS_FAILED");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
        let message = err.to_string();
        assert!(message.contains("Failed to send request"));
        assert!(message.contains("connection refused"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_metadata_superseded_is_silent() {
        let err = WorkflowError::Superseded;
        assert!(!err.is_user_facing());
        assert!(!err.is_recoverable());
        assert_eq!(err.suggested_action(), None);
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_suggested_actions() {
        assert_eq!(
            WorkflowError::NoFileSelected.suggested_action(),
            Some("Upload a file first")
        );
        assert_eq!(
            WorkflowError::AnalysisInFlight.suggested_action(),
            Some("Wait for the current analysis to finish")
        );
    }
}
