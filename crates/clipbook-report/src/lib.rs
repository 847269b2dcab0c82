//! Output side of clipbook: the DOCX document and published exports.
//!
//! - [`render_docx`] serializes a [`DocumentModel`](clipbook_core::DocumentModel)
//!   to Word XML with hyperlinked citation dates.
//! - [`DirectoryPublisher`] drops export copies into a directory, refusing
//!   stale exports and pruning superseded ones by their file names.

mod docx;
mod error;
mod publish;

pub use docx::{render_docx, write_docx};
pub use error::{PublishError, RenderError};
pub use publish::{DirectoryPublisher, PublishOutcome, Publisher};
