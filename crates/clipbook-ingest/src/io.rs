//! Atomic file writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Write `bytes` to `path` through a sibling temp file and a rename, so a
/// reader never observes a half-written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| IngestError::write(parent, e))?;
    }

    let temp_path = temp_path_for(path);
    let mut file = File::create(&temp_path).map_err(|e| IngestError::write(&temp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| IngestError::write(&temp_path, e))?;
    file.sync_all()
        .map_err(|e| IngestError::write(&temp_path, e))?;
    drop(file);

    fs::rename(&temp_path, path).map_err(|source| {
        let _ = fs::remove_file(&temp_path);
        IngestError::AtomicWriteFailed {
            temp_path: temp_path.clone(),
            target_path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "file written");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
