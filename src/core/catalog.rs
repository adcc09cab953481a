//! Job Catalog.
//!
//! Lists and resolves job scripts under `<jobs>/<project>/<job>.sh`.
//!
//! Every lookup goes through [`resolve_within`], which canonicalizes both the
//! root and the candidate path and requires the candidate to sit inside the
//! root. Name validation runs first so obviously unsafe input never touches
//! the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::constants::SCRIPT_EXTENSION;
use crate::core::types::JobName;
use crate::core::validation::{self, is_safe_name};
use crate::error::{Result, StoreError};

const SCRIPT_TEMPLATE: &str = r#"#!/usr/bin/env bash
set -euo pipefail

echo "Running ${JOB_NAME} for ${JOB_PROJECT} (started ${JOB_START_TIME})"
"#;

/// Resolve `segments` under `root`, refusing anything that lands outside it.
///
/// Returns `None` when the joined path does not exist, cannot be
/// canonicalized, or its canonical form is neither the canonical root nor
/// below it. Never panics or errors, so callers can treat `None` as
/// "not found".
pub fn resolve_within<I, S>(root: &Path, segments: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let canonical_root = root.canonicalize().ok()?;
    let mut joined = root.to_path_buf();
    for segment in segments {
        joined.push(segment);
    }
    let canonical = joined.canonicalize().ok()?;

    // Component-wise prefix: equal to the root, or root followed by a separator.
    if canonical.starts_with(&canonical_root) {
        Some(canonical)
    } else {
        warn!(path = %joined.display(), "rejected path outside jobs root");
        None
    }
}

/// Catalog of job scripts on disk.
#[derive(Debug, Clone)]
pub struct JobCatalog {
    root: PathBuf,
}

impl JobCatalog {
    /// Create a catalog rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Jobs root directory as configured.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical directory of a project, if the name is safe and it exists.
    pub fn project_dir(&self, project: &str) -> Option<PathBuf> {
        if !is_safe_name(project) {
            return None;
        }
        resolve_within(&self.root, [project]).filter(|p| p.is_dir())
    }

    /// Sorted job names available in a project.
    ///
    /// Unsafe or missing projects yield an empty list.
    pub fn list_jobs(&self, project: &str) -> Vec<JobName> {
        let Some(dir) = self.project_dir(project) else {
            debug!(project, "no such project directory");
            return Vec::new();
        };

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(project, error = %e, "failed to read project directory");
                return Vec::new();
            }
        };

        let mut jobs: Vec<JobName> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(SCRIPT_EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .filter(|name| self.script_path(project, name).is_some())
            .collect();
        jobs.sort();
        jobs
    }

    /// Canonical path of a job script, if both names are safe and the file
    /// exists inside the project directory.
    pub fn script_path(&self, project: &str, job: &str) -> Option<PathBuf> {
        if !is_safe_name(project) || !is_safe_name(job) {
            return None;
        }
        let project_dir = self.project_dir(project)?;
        let file = format!("{}.{}", job, SCRIPT_EXTENSION);
        resolve_within(&self.root, [project, file.as_str()])
            .filter(|p| p.starts_with(&project_dir) && p.is_file())
    }

    /// Whether a job exists in a project.
    pub fn job_exists(&self, project: &str, job: &str) -> bool {
        self.script_path(project, job).is_some()
    }

    /// Create a starter script at `<root>/<project>/<job>.sh`, mode 0755.
    ///
    /// # Errors
    ///
    /// Returns a validation error for unsafe names,
    /// `StoreError::AlreadyExists` if the script is present, or
    /// `StoreError::Write` if it cannot be written.
    pub fn scaffold(&self, project: &str, job: &str) -> Result<PathBuf> {
        validation::validate_project(project)?;
        validation::validate_job(job)?;

        let dir = self.root.join(project);
        let path = dir.join(format!("{}.{}", job, SCRIPT_EXTENSION));
        if path.exists() {
            return Err(StoreError::AlreadyExists(path).into());
        }

        let write_err = |source| StoreError::Write {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&dir).map_err(write_err)?;
        fs::write(&path, SCRIPT_TEMPLATE).map_err(write_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).map_err(write_err)?;
        }

        debug!(path = %path.display(), "job script created");
        Ok(path)
    }
}
