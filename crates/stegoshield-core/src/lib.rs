//! StegoShield Core Library
//!
//! This crate provides the domain models, error types and configuration that are
//! shared by the upload workflow, the classification API client and the CLI.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ErrorMetadata, LogLevel, WorkflowError};
pub use models::{
    format_confidence, AnalysisResult, FileSource, MediaCategory, SelectedFile, Verdict,
    ACCEPTED_CONTENT_TYPES,
};
