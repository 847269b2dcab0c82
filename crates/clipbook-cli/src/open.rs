//! Loading a source file into a ready-to-use reviewer.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use clipbook_core::{CheckpointPolicy, ReviewSession, Reviewer, TopicVocabulary};
use clipbook_ingest::{ColumnMapping, LoadOptions, LoadReport, load_rows};
use clipbook_report::DirectoryPublisher;

use crate::config::ClipbookConfig;
use crate::sink::FileSink;

/// A loaded source: the reviewer plus what loading found.
pub struct OpenedReview {
    pub reviewer: Reviewer<FileSink>,
    pub mapping: ColumnMapping,
    pub report: LoadReport,
}

/// Load `source` and build a session configured by `config`.
///
/// Loading never rewrites the source; the first checkpoint does.
pub fn open_review(source: &Path, config: &ClipbookConfig) -> Result<OpenedReview> {
    let options = LoadOptions {
        overrides: config.column_overrides()?,
    };
    let loaded =
        load_rows(source, &options).with_context(|| format!("load {}", source.display()))?;
    info!(
        source = %source.display(),
        total = loaded.report.total_rows,
        kept = loaded.report.kept_rows(),
        removed_missing_url = loaded.report.removed_missing_url,
        removed_duplicates = loaded.report.removed_duplicates,
        "loaded rows"
    );

    let session = ReviewSession::new(
        loaded.rows,
        TopicVocabulary::new(config.review.starter_topics.iter().map(String::as_str)),
        config.citation.clone(),
        CheckpointPolicy::new(config.review.save_interval),
    );
    let publisher = config
        .publish
        .directory
        .as_ref()
        .map(|dir| DirectoryPublisher::new(dir).with_prune(config.publish.prune));
    let sink = FileSink::new(source, config.document_path(source)).with_publisher(publisher);

    Ok(OpenedReview {
        reviewer: Reviewer::new(session, sink),
        mapping: loaded.mapping,
        report: loaded.report,
    })
}
