//! Review session core.
//!
//! A [`ReviewSession`] owns a [`RowSet`](clipbook_model::RowSet) and walks it
//! row by row. Each pass or bullet updates the row status, the
//! [`TopicContentIndex`], the undo [`ActionHistory`] and the rendered
//! [`DocumentModel`] together, then asks the [`CheckpointPolicy`] whether a
//! save is due. [`Reviewer`] pairs a session with a [`CheckpointSink`] that
//! performs the saves.

pub mod checkpoint;
pub mod controller;
pub mod cursor;
pub mod document;
pub mod error;
pub mod excerpt;
pub mod export_name;
pub mod history;
pub mod session;
pub mod topics;

pub use checkpoint::{CheckpointPolicy, CheckpointTrigger, DEFAULT_SAVE_INTERVAL};
pub use controller::{ActionReport, CheckpointOutcome, CheckpointRequest, CheckpointSink, Reviewer};
pub use cursor::TraversalCursor;
pub use document::{Alignment, Block, CitationStyle, DocumentModel, Run, render_document};
pub use error::{ActionRejected, PersistenceError};
pub use excerpt::{DATE_PLACEHOLDER, display_date, excerpt_for, quote_text};
pub use export_name::{ExportName, ExportStatus, derive_export_name, sanitize_component};
pub use history::{ActionHistory, HistoryAction, HistoryEntry};
pub use session::{ActionOutcome, ReviewSession};
pub use topics::{TopicContentIndex, TopicVocabulary};
