//! Upload workflow: selection, detection, preview and analysis.
//!
//! [`UploadSession`] is the plain state machine; [`UploadWorkflow`] drives it
//! asynchronously and publishes [`SessionSnapshot`]s for a presentation layer.
//! Every asynchronous completion carries a [`Ticket`] and is only applied when it
//! still belongs to the current selection.

pub mod preview;
pub mod reader;
pub mod session;
pub mod workflow;

pub use preview::{encode_data_uri, render_preview, PreviewHandle};
pub use reader::{LocalReader, MediaReader};
pub use session::{SessionSnapshot, Ticket, UploadSession};
pub use workflow::{AnalysisTask, Selection, UploadWorkflow};
