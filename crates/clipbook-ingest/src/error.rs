//! Error types for spreadsheet ingestion.

use std::path::PathBuf;
use thiserror::Error;

use clipbook_model::ModelError;

use crate::schema::LogicalField;

/// The source's columns cannot feed the logical schema.
///
/// Fatal to session initialization: no partial session is created.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// No header resolved to the URL field.
    #[error("no URL column found (looked for: {candidates})")]
    MissingUrlColumn { candidates: String },

    /// One header claimed by two logical fields.
    #[error("column '{column}' is mapped to both {first} and {second}")]
    DuplicateMapping {
        column: String,
        first: LogicalField,
        second: LogicalField,
    },

    /// A configured override names a header that does not exist.
    #[error("column '{column}' configured for {field} does not exist")]
    UnknownColumn { column: String, field: LogicalField },
}

/// Errors that can occur while loading or persisting rows.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temp file could not be renamed over the target.
    #[error("failed to replace {target_path} with {temp_path}: {source}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Format Errors ===
    /// Extension is neither `.csv` nor `.xlsx`.
    #[error("unsupported spreadsheet format: {path} (expected .csv or .xlsx)")]
    UnsupportedFormat { path: PathBuf },

    /// Failed to parse or encode CSV.
    #[error("CSV error in {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Failed to parse or encode XLSX.
    #[error("XLSX error in {path}: {message}")]
    Xlsx { path: PathBuf, message: String },

    // === Schema Errors ===
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IngestError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::FileRead { path, source }
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Whether this error rejects the source's schema.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
