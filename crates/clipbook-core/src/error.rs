//! Error types for review actions and checkpoints.

use thiserror::Error;

/// A review action that was refused without mutating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionRejected {
    #[error("topic must not be blank")]
    EmptyTopic,

    #[error("no unreviewed rows remain")]
    EndOfData,

    #[error("nothing to undo")]
    NothingToUndo,
}

/// A checkpoint write failed. In-memory review state is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    #[error("saving rows failed: {0}")]
    Rows(String),

    #[error("writing the document failed: {0}")]
    Document(String),

    #[error("publishing {name} failed: {message}")]
    Publish { name: String, message: String },
}

impl PersistenceError {
    /// Next step to suggest to the reviewer.
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Rows(_) => "Close the spreadsheet in other programs, then save again.",
            Self::Document(_) => "Close the document in other programs, then save again.",
            Self::Publish { .. } => "Check the publish directory, then save again.",
        }
    }
}
