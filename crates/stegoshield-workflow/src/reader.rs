//! Local file reading used by the preview renderer and the analysis path.

use async_trait::async_trait;
use bytes::Bytes;
use stegoshield_core::SelectedFile;

/// Reads the full content of a selected file.
#[async_trait]
pub trait MediaReader: Send + Sync {
    async fn read(&self, file: &SelectedFile) -> std::io::Result<Bytes>;
}

/// Reads straight from the file's own source (memory or disk).
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalReader;

#[async_trait]
impl MediaReader for LocalReader {
    async fn read(&self, file: &SelectedFile) -> std::io::Result<Bytes> {
        file.read().await
    }
}
