//! `clipbook.toml` configuration.
//!
//! ```toml
//! [review]
//! save_interval = 20
//! document = "review.docx"
//! starter_topics = ["Economy", "Healthcare"]
//!
//! [citation]
//! platform = "X"
//! handle = "@senator"
//!
//! [columns]
//! url = "Permalink"
//! corrected_date = "Date (fixed)"
//!
//! [publish]
//! directory = "/shared/reviews"
//! prune = true
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use clipbook_core::{CitationStyle, DEFAULT_SAVE_INTERVAL};
use clipbook_ingest::{ColumnOverrides, LogicalField};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "clipbook.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipbookConfig {
    pub review: ReviewSettings,
    pub citation: CitationStyle,
    /// Logical field name to source header.
    pub columns: BTreeMap<String, String>,
    pub publish: PublishSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSettings {
    /// Actions between automatic saves.
    pub save_interval: usize,
    /// Output document; defaults to the source path with a `.docx` extension.
    pub document: Option<PathBuf>,
    /// Topics offered before any bullet is filed.
    pub starter_topics: Vec<String>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            save_interval: DEFAULT_SAVE_INTERVAL,
            document: None,
            starter_topics: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishSettings {
    /// Directory receiving export copies. Publishing is off when unset.
    pub directory: Option<PathBuf>,
    /// Delete older exports of the same review after publishing.
    pub prune: bool,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            directory: None,
            prune: true,
        }
    }
}

impl ClipbookConfig {
    /// Load `path`, or `clipbook.toml` in the working directory.
    ///
    /// An explicit path must exist; the default file may be absent, in
    /// which case defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        match fs::read_to_string(&path) {
            Ok(content) => {
                let config = Self::parse(&content)
                    .with_context(|| format!("parse config {}", path.display()))?;
                tracing::info!(path = %path.display(), "loaded config");
                Ok(config)
            }
            Err(error) if error.kind() == ErrorKind::NotFound && !explicit => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(error) => {
                Err(error).with_context(|| format!("read config {}", path.display()))
            }
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.column_overrides()?;
        Ok(config)
    }

    /// The `[columns]` table keyed by logical field.
    pub fn column_overrides(&self) -> Result<ColumnOverrides> {
        let mut overrides = ColumnOverrides::new();
        for (key, header) in &self.columns {
            let normalized = key.trim().to_lowercase().replace([' ', '-'], "_");
            let Some(field) = LogicalField::ALL
                .into_iter()
                .find(|field| field.as_str() == normalized)
            else {
                let known: Vec<&str> = LogicalField::ALL.into_iter().map(LogicalField::as_str).collect();
                bail!("unknown column field '{key}' (expected one of: {})", known.join(", "));
            };
            overrides.insert(field, header.clone());
        }
        Ok(overrides)
    }

    /// Document written at each checkpoint for `source`.
    pub fn document_path(&self, source: &Path) -> PathBuf {
        match &self.review.document {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => source
                .parent()
                .map_or_else(|| path.clone(), |dir| dir.join(path)),
            None => source.with_extension("docx"),
        }
    }
}
