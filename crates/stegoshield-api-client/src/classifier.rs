//! Classifier trait for the upload workflow.
//!
//! The workflow only needs "send these bytes, get a verdict back". Implementations
//! talk to the remote classification service; tests substitute in-process fakes.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use stegoshield_core::AnalysisResult;

use crate::ApiClient;

/// Remote classifier that judges whether a media file is malicious.
///
/// Implementations must not retry on their own; retries are user-initiated.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<AnalysisResult>;
}

#[async_trait]
impl Classifier for ApiClient {
    async fn classify(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> Result<AnalysisResult> {
        self.predict_bytes(file_name, content_type, data).await
    }
}
