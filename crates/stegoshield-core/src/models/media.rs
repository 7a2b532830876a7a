use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Content types a file picker should offer for selection.
pub const ACCEPTED_CONTENT_TYPES: &str = "image/*,audio/*,video/*";

/// Media category derived from a file's declared content type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Audio,
    Video,
    #[default]
    Unknown,
}

impl MediaCategory {
    /// Classify a declared content type such as `image/png` or `video/webm; codecs=vp9`.
    ///
    /// Detection is total: a missing, malformed or unrecognized type yields
    /// [`MediaCategory::Unknown`] instead of an error.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(content_type) = content_type else {
            return MediaCategory::Unknown;
        };

        // Drop MIME parameters before splitting into type/subtype.
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        let Some((prefix, subtype)) = essence.split_once('/') else {
            return MediaCategory::Unknown;
        };
        if subtype.trim().is_empty() {
            return MediaCategory::Unknown;
        }

        match prefix.trim().to_ascii_lowercase().as_str() {
            "image" => MediaCategory::Image,
            "audio" => MediaCategory::Audio,
            "video" => MediaCategory::Video,
            _ => MediaCategory::Unknown,
        }
    }

    /// Whether a local preview can be rendered for this category.
    pub fn is_previewable(self) -> bool {
        !matches!(self, MediaCategory::Unknown)
    }

    /// Name of the display element a presentation layer should render the preview in.
    pub fn preview_element(self) -> Option<&'static str> {
        match self {
            MediaCategory::Image => Some("img"),
            MediaCategory::Audio => Some("audio"),
            MediaCategory::Video => Some("video"),
            MediaCategory::Unknown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Audio => "audio",
            MediaCategory::Video => "video",
            MediaCategory::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the bytes of a selected file live.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Content already held in memory (e.g. handed over by a file picker).
    Memory(Bytes),
    /// Content read lazily from a local path.
    Disk(PathBuf),
}

/// A user-chosen file: its name, declared content type and raw bytes.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    content_type: Option<String>,
    source: FileSource,
}

impl SelectedFile {
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: Option<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type,
            source: FileSource::Memory(data.into()),
        }
    }

    /// Reference a file on disk. Nothing is read until [`SelectedFile::read`] is called.
    pub fn from_path(path: impl AsRef<Path>, content_type: Option<String>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        Self {
            name,
            content_type,
            source: FileSource::Disk(path.to_path_buf()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    pub fn media_category(&self) -> MediaCategory {
        MediaCategory::from_content_type(self.content_type())
    }

    /// Read the full file content.
    pub async fn read(&self) -> std::io::Result<Bytes> {
        match &self.source {
            FileSource::Memory(data) => Ok(data.clone()),
            FileSource::Disk(path) => tokio::fs::read(path).await.map(Bytes::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_prefixes_map_to_their_category() {
        assert_eq!(
            MediaCategory::from_content_type(Some("image/png")),
            MediaCategory::Image
        );
        assert_eq!(
            MediaCategory::from_content_type(Some("audio/mpeg")),
            MediaCategory::Audio
        );
        assert_eq!(
            MediaCategory::from_content_type(Some("video/mp4")),
            MediaCategory::Video
        );
    }

    #[test]
    fn other_prefixes_are_unknown() {
        assert_eq!(
            MediaCategory::from_content_type(Some("application/pdf")),
            MediaCategory::Unknown
        );
        assert_eq!(
            MediaCategory::from_content_type(Some("text/plain")),
            MediaCategory::Unknown
        );
        // Prefix must match exactly, not just start with the category name
        assert_eq!(
            MediaCategory::from_content_type(Some("imagery/png")),
            MediaCategory::Unknown
        );
    }

    #[test]
    fn missing_or_malformed_types_are_unknown() {
        assert_eq!(MediaCategory::from_content_type(None), MediaCategory::Unknown);
        assert_eq!(
            MediaCategory::from_content_type(Some("")),
            MediaCategory::Unknown
        );
        assert_eq!(
            MediaCategory::from_content_type(Some("image")),
            MediaCategory::Unknown
        );
        assert_eq!(
            MediaCategory::from_content_type(Some("image/")),
            MediaCategory::Unknown
        );
        assert_eq!(
            MediaCategory::from_content_type(Some("/png")),
            MediaCategory::Unknown
        );
    }

    #[test]
    fn parameters_and_case_are_ignored() {
        assert_eq!(
            MediaCategory::from_content_type(Some("video/webm; codecs=vp9")),
            MediaCategory::Video
        );
        assert_eq!(
            MediaCategory::from_content_type(Some(" IMAGE/JPEG ")),
            MediaCategory::Image
        );
    }

    #[test]
    fn only_known_categories_are_previewable() {
        assert!(MediaCategory::Image.is_previewable());
        assert!(MediaCategory::Audio.is_previewable());
        assert!(MediaCategory::Video.is_previewable());
        assert!(!MediaCategory::Unknown.is_previewable());
        assert_eq!(MediaCategory::Unknown.preview_element(), None);
        assert_eq!(MediaCategory::Audio.preview_element(), Some("audio"));
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&MediaCategory::Video).unwrap();
        assert_eq!(json, "\"video\"");
        assert_eq!(MediaCategory::Unknown.to_string(), "unknown");
    }

    #[test]
    fn from_path_takes_file_name() {
        let file = SelectedFile::from_path("/tmp/some/dir/cat.png", Some("image/png".into()));
        assert_eq!(file.name(), "cat.png");
        assert_eq!(file.media_category(), MediaCategory::Image);
    }

    #[tokio::test]
    async fn read_returns_memory_bytes() {
        let file = SelectedFile::from_bytes("a.wav", Some("audio/wav".into()), vec![1u8, 2, 3]);
        let data = file.read().await.unwrap();
        assert_eq!(&data[..], &[1, 2, 3]);
    }

    #[tokio::test]
    async fn read_loads_disk_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not really a video").unwrap();

        let file = SelectedFile::from_path(&path, Some("video/mp4".into()));
        let data = file.read().await.unwrap();
        assert_eq!(&data[..], b"not really a video");
    }

    #[tokio::test]
    async fn read_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = SelectedFile::from_path(dir.path().join("gone.png"), Some("image/png".into()));
        assert!(file.read().await.is_err());
    }
}
