//! Publishing export copies into a shared directory.
//!
//! Export names encode `(handle, firstDate, lastDate, timestamp)`; exports
//! sharing `(handle, firstDate)` belong to one review and only the newest
//! is kept. Files whose names do not parse as export names are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use clipbook_core::ExportName;
use clipbook_ingest::write_atomic;

use crate::error::PublishError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The file was written; older exports of the same review were removed.
    Written { path: PathBuf, pruned: Vec<PathBuf> },
    /// A file with identical content already exists.
    Unchanged { existing: PathBuf },
}

/// Destination for export copies.
pub trait Publisher {
    fn publish(&self, bytes: &[u8], name: &str) -> Result<PublishOutcome, PublishError>;
}

/// Publishes into a local (possibly synced) directory.
#[derive(Debug, Clone)]
pub struct DirectoryPublisher {
    directory: PathBuf,
    prune: bool,
}

struct Existing {
    path: PathBuf,
    file_name: String,
    name: ExportName,
}

impl DirectoryPublisher {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prune: true,
        }
    }

    /// Keep superseded exports instead of deleting them.
    pub fn with_prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn exports_in_series(&self, name: &ExportName) -> Result<Vec<Existing>, PublishError> {
        let entries = fs::read_dir(&self.directory).map_err(|source| PublishError::ListDirectory {
            path: self.directory.clone(),
            source,
        })?;
        let mut series = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PublishError::ListDirectory {
                path: self.directory.clone(),
                source,
            })?;
            if !entry.file_type().is_ok_and(|t| t.is_file()) {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Some(existing) = ExportName::parse(&file_name) else {
                continue;
            };
            if existing.same_series(name) {
                series.push(Existing {
                    path: entry.path(),
                    file_name,
                    name: existing,
                });
            }
        }
        series.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(series)
    }
}

fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

fn file_digest(path: &Path) -> Result<[u8; 32], PublishError> {
    let bytes = fs::read(path).map_err(|source| PublishError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(digest(&bytes))
}

impl Publisher for DirectoryPublisher {
    fn publish(&self, bytes: &[u8], name: &str) -> Result<PublishOutcome, PublishError> {
        fs::create_dir_all(&self.directory).map_err(|source| PublishError::ListDirectory {
            path: self.directory.clone(),
            source,
        })?;
        let target = self.directory.join(name);
        let content_digest = digest(bytes);

        let Some(parsed) = ExportName::parse(name) else {
            if target.is_file() && file_digest(&target)? == content_digest {
                return Ok(PublishOutcome::Unchanged { existing: target });
            }
            write_atomic(&target, bytes)?;
            tracing::info!(path = %target.display(), "published file");
            return Ok(PublishOutcome::Written {
                path: target,
                pruned: Vec::new(),
            });
        };

        let series = self.exports_in_series(&parsed)?;
        if let Some(newer) = series.iter().find(|e| e.name.is_newer_than(&parsed)) {
            tracing::warn!(name, newer = %newer.file_name, "publish superseded");
            return Err(PublishError::Superseded {
                name: name.to_string(),
                newer: newer.file_name.clone(),
            });
        }
        for existing in &series {
            if file_digest(&existing.path)? == content_digest {
                tracing::info!(
                    existing = %existing.file_name,
                    sha256 = %hex::encode(&content_digest[..8]),
                    "identical export already published"
                );
                return Ok(PublishOutcome::Unchanged {
                    existing: existing.path.clone(),
                });
            }
        }

        write_atomic(&target, bytes)?;
        let mut pruned = Vec::new();
        if self.prune {
            for existing in series.iter().filter(|e| e.file_name != name) {
                fs::remove_file(&existing.path).map_err(|source| PublishError::Remove {
                    path: existing.path.clone(),
                    source,
                })?;
                pruned.push(existing.path.clone());
            }
        }
        tracing::info!(
            path = %target.display(),
            pruned = pruned.len(),
            sha256 = %hex::encode(&content_digest[..8]),
            "published export"
        );
        Ok(PublishOutcome::Written {
            path: target,
            pruned,
        })
    }
}
