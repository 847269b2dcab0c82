//! File-backed checkpoint sink.

use std::path::{Path, PathBuf};

use clipbook_core::{CheckpointRequest, CheckpointSink, PersistenceError};
use clipbook_ingest::{SourceFormat, encode_rows, persist_rows, write_atomic};
use clipbook_model::RowSet;
use clipbook_report::{DirectoryPublisher, PublishOutcome, Publisher, write_docx};

/// Saves rows back to the source file and the document next to it, and
/// optionally publishes a reviewed copy into a shared directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    source: PathBuf,
    document: PathBuf,
    publisher: Option<DirectoryPublisher>,
}

impl FileSink {
    pub fn new(source: impl Into<PathBuf>, document: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            document: document.into(),
            publisher: None,
        }
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: Option<DirectoryPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn publisher(&self) -> Option<&DirectoryPublisher> {
        self.publisher.as_ref()
    }

    fn publish(
        publisher: &DirectoryPublisher,
        rows: &RowSet,
        file_name: &str,
    ) -> Result<String, PersistenceError> {
        let publish_error = |message: String| PersistenceError::Publish {
            name: file_name.to_string(),
            message,
        };
        let target = publisher.directory().join(file_name);
        let format = SourceFormat::from_path(&target).map_err(|e| publish_error(e.to_string()))?;
        let bytes = encode_rows(rows, format, &target).map_err(|e| publish_error(e.to_string()))?;
        match publisher
            .publish(&bytes, file_name)
            .map_err(|e| publish_error(e.to_string()))?
        {
            PublishOutcome::Written { path, .. } => Ok(path.display().to_string()),
            PublishOutcome::Unchanged { existing } => {
                Ok(format!("{} (unchanged)", existing.display()))
            }
        }
    }
}

impl CheckpointSink for FileSink {
    fn checkpoint(&mut self, request: &CheckpointRequest<'_>) -> Result<(), PersistenceError> {
        persist_rows(&self.source, request.rows)
            .map_err(|e| PersistenceError::Rows(e.to_string()))?;
        write_docx(&self.document, request.document)
            .map_err(|e| PersistenceError::Document(e.to_string()))?;
        if let Some(publisher) = &self.publisher {
            let location = Self::publish(publisher, request.rows, &request.export_name.file_name())?;
            tracing::debug!(%location, "published checkpoint copy");
        }
        Ok(())
    }

    fn export_copy(&mut self, rows: &RowSet, file_name: &str) -> Result<String, PersistenceError> {
        if let Some(publisher) = &self.publisher {
            return Self::publish(publisher, rows, file_name);
        }
        let target = self
            .source
            .parent()
            .map_or_else(|| PathBuf::from(file_name), |dir| dir.join(file_name));
        let rows_error = |e: clipbook_ingest::IngestError| PersistenceError::Rows(e.to_string());
        let format = SourceFormat::from_path(&target).map_err(rows_error)?;
        let bytes = encode_rows(rows, format, &target).map_err(rows_error)?;
        write_atomic(&target, &bytes).map_err(rows_error)?;
        Ok(target.display().to_string())
    }
}
