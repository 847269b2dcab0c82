//! Snapshot of a source file's review progress.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;

use clipbook_core::{CheckpointSink, ExportName, Reviewer};
use clipbook_ingest::{ColumnMapping, LoadReport};
use clipbook_model::SessionCounters;

#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub topic: String,
    pub excerpts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub source: PathBuf,
    pub rows: usize,
    pub remaining: usize,
    pub counters: SessionCounters,
    /// Index of the next row to review; equals `rows` when done.
    pub cursor: usize,
    pub load: LoadReport,
    pub mapping: ColumnMapping,
    pub topics: Vec<TopicSummary>,
    pub export_name: ExportName,
}

impl StatusReport {
    pub fn collect<S: CheckpointSink>(
        source: &Path,
        reviewer: &Reviewer<S>,
        mapping: &ColumnMapping,
        load: LoadReport,
        generated_at: NaiveDateTime,
    ) -> Self {
        let session = reviewer.session();
        let topics = session
            .topic_index()
            .iter()
            .map(|(topic, excerpts)| TopicSummary {
                topic: topic.to_string(),
                excerpts: excerpts.len(),
            })
            .collect();
        Self {
            source: source.to_path_buf(),
            rows: session.rows().len(),
            remaining: session.remaining(),
            counters: session.counters(),
            cursor: session.cursor(),
            load,
            mapping: mapping.clone(),
            topics,
            export_name: session.export_name(generated_at),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}
