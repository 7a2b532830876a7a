pub mod analysis;
pub mod media;

pub use analysis::{format_confidence, AnalysisResult, Verdict};
pub use media::{FileSource, MediaCategory, SelectedFile, ACCEPTED_CONTENT_TYPES};
