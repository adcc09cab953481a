//! Whole-file persistence helpers.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};

/// Read a file to a string, treating a missing file as `None`.
///
/// # Errors
///
/// Returns `StoreError::Read` for any failure other than "not found".
pub fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Read {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}

/// Replace a file's contents in one step.
///
/// Writes a uniquely named temp file next to the target, syncs it, and
/// renames it over the target, so readers see either the old document or
/// the new one. Concurrent writers each get their own temp file and the
/// last rename wins. Creates the parent directory if needed.
///
/// # Errors
///
/// Returns `StoreError::Write` if any filesystem step fails.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_err)?;

    let mut file = NamedTempFile::new_in(parent).map_err(write_err)?;
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    file.as_file().sync_all().map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
