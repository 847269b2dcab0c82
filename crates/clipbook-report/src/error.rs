use std::path::PathBuf;

use thiserror::Error;

use clipbook_ingest::IngestError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to build document archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to encode document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error while rendering: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Write(#[from] IngestError),
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// A newer export of the same review already exists.
    #[error("{name} is superseded by newer export {newer}")]
    Superseded { name: String, newer: String },

    #[error("failed to list {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Write(#[from] IngestError),
}

impl PublishError {
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded { .. })
    }
}
