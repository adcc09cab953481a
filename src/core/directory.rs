//! Project Directory.
//!
//! Maps each caller token to the one project it may run jobs in. Backed by
//! a JSON document of the form:
//!
//! ```json
//! { "clients": { "<token>": { "project": "project-a", "description": "CI" } } }
//! ```
//!
//! Every mutation rewrites the whole document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::credentials::fingerprint;
use crate::core::persist;
use crate::core::types::{ProjectName, Token};
use crate::core::validation;
use crate::error::{Result, StoreError};

/// A caller's project assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub project: ProjectName,
    #[serde(default)]
    pub description: String,
}

/// On-disk clients document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsDocument {
    #[serde(default)]
    pub clients: BTreeMap<Token, Assignment>,
}

impl ClientsDocument {
    /// Read the document at `path`. A missing file is an empty document.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` or `StoreError::Parse`.
    pub fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading clients document");
        let Some(contents) = persist::read_optional(path)? else {
            warn!(path = %path.display(), "clients document not found, starting with no assignments");
            return Ok(Self::default());
        };
        serde_json::from_str(&contents).map_err(|source| {
            StoreError::Parse {
                path: path.to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// Write the full document to `path`.
    ///
    /// # Errors
    ///
    /// Returns a serialization or `StoreError::Write` error.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut contents = serde_json::to_string_pretty(self)?;
        contents.push('\n');
        persist::write_atomic(path, &contents)
    }
}

/// Process-wide caller to project mapping.
#[derive(Debug)]
pub struct ProjectDirectory {
    path: PathBuf,
    document: RwLock<ClientsDocument>,
}

impl ProjectDirectory {
    /// Load the directory from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = ClientsDocument::read(&path)?;
        debug!(clients = document.clients.len(), "clients loaded");
        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    /// An empty directory that persists to `path` on first mutation.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: RwLock::new(ClientsDocument::default()),
        }
    }

    /// Re-read the document from disk and replace the in-memory mapping.
    ///
    /// On error the current mapping is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn reload(&self) -> Result<usize> {
        let document = ClientsDocument::read(&self.path)?;
        let count = document.clients.len();
        *self.document.write() = document;
        info!(count, "clients reloaded");
        Ok(count)
    }

    /// Project assigned to a caller, if any.
    pub fn get_project(&self, caller: &str) -> Option<ProjectName> {
        self.document
            .read()
            .clients
            .get(caller.trim())
            .map(|a| a.project.clone())
    }

    /// Full assignment for a caller, if any.
    pub fn get(&self, caller: &str) -> Option<Assignment> {
        self.document.read().clients.get(caller.trim()).cloned()
    }

    /// Assign a caller to a project, replacing any previous assignment,
    /// and persist the document.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty tokens or unsafe project names,
    /// or a store error if the document cannot be written.
    pub fn assign(&self, caller: &str, project: &str, description: &str) -> Result<()> {
        validation::validate_token(caller)?;
        validation::validate_project(project)?;

        let mut document = self.document.write();
        let mut updated = document.clone();
        let previous = updated.clients.insert(
            caller.trim().to_string(),
            Assignment {
                project: project.to_string(),
                description: description.to_string(),
            },
        );
        updated.write(&self.path)?;
        *document = updated;

        info!(
            client = %fingerprint(caller),
            project,
            replaced = ?previous.map(|p| p.project),
            "client assigned"
        );
        Ok(())
    }

    /// Remove a caller's assignment. Persists only if one existed.
    ///
    /// # Errors
    ///
    /// Returns a store error if the document cannot be written.
    pub fn remove(&self, caller: &str) -> Result<bool> {
        let mut document = self.document.write();
        let mut updated = document.clone();
        if updated.clients.remove(caller.trim()).is_none() {
            return Ok(false);
        }
        updated.write(&self.path)?;
        *document = updated;

        info!(client = %fingerprint(caller), "client removed");
        Ok(true)
    }

    /// All assignments, ordered by token.
    pub fn list(&self) -> Vec<(Token, Assignment)> {
        self.document
            .read()
            .clients
            .iter()
            .map(|(token, a)| (token.clone(), a.clone()))
            .collect()
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.document.read().clients.len()
    }

    /// Whether there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
