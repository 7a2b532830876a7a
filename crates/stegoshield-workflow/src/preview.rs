//! Preview renderer.
//!
//! Turns a selected file into a self-contained `data:` URI that a presentation
//! layer can display without any network round trip. Files of an unknown media
//! category are never read.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Serialize, Serializer};
use stegoshield_core::SelectedFile;

use crate::reader::MediaReader;

/// Displayable, locally encoded representation of the selected file.
///
/// Empty when nothing is selected, the category is unknown, the read is still
/// pending, or the read failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewHandle(Option<Arc<str>>);

impl PreviewHandle {
    pub fn empty() -> Self {
        Self(None)
    }

    pub fn from_uri(uri: impl Into<Arc<str>>) -> Self {
        Self(Some(uri.into()))
    }

    pub fn as_uri(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl Serialize for PreviewHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_uri().serialize(serializer)
    }
}

/// Encode bytes as `data:<content type>;base64,<payload>`.
///
/// Whitespace around the type and its `;` parameters is dropped so the media
/// type stays valid inside the URI.
pub fn encode_data_uri(content_type: &str, data: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        normalize_media_type(content_type),
        STANDARD.encode(data)
    )
}

fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .map(|part| {
            let part = part.trim();
            match part.split_once('=') {
                Some((key, value)) => format!("{}={}", key.trim(), value.trim()),
                None => part.to_string(),
            }
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(";")
}

/// Read the file and encode it for display.
///
/// Unknown categories short-circuit to an empty handle without touching the
/// reader. Read failures degrade to an empty handle and are only logged.
pub async fn render_preview(reader: &dyn MediaReader, file: &SelectedFile) -> PreviewHandle {
    let category = file.media_category();
    if !category.is_previewable() {
        return PreviewHandle::empty();
    }

    let data = match reader.read(file).await {
        Ok(data) => data,
        Err(err) => {
            tracing::warn!(
                file_name = %file.name(),
                media_category = %category,
                error = %err,
                "Failed to read file for preview; showing no preview"
            );
            return PreviewHandle::empty();
        }
    };

    let content_type = file.content_type().unwrap_or_default().to_string();
    let size = data.len();

    match tokio::task::spawn_blocking(move || encode_data_uri(&content_type, &data)).await {
        Ok(uri) => {
            tracing::debug!(
                file_name = %file.name(),
                media_category = %category,
                size,
                "Preview rendered"
            );
            PreviewHandle::from_uri(uri)
        }
        Err(err) => {
            tracing::warn!(
                file_name = %file.name(),
                error = %err,
                "Preview encoding task failed; showing no preview"
            );
            PreviewHandle::empty()
        }
    }
}
