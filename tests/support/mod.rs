//! Test support utilities for jobhook integration tests.
//!
//! Provides an isolated workspace laid out like a deployment (tokens file,
//! clients document, jobs tree) plus HTTP and CLI helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;

use jobhook::core::catalog::JobCatalog;
use jobhook::core::credentials::CredentialStore;
use jobhook::core::directory::ProjectDirectory;
use jobhook::server::AppState;
use tempfile::TempDir;

/// Isolated workspace.
///
/// Paths match the CLI defaults relative to `dir`, so child processes only
/// need `.current_dir()`. No process-global state is mutated.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    /// Create an empty workspace.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Workspace with the standard tokens, assignments and jobs.
    pub fn with_fixture() -> Self {
        let t = Self::new();
        t.write_tokens(STANDARD_TOKENS);
        t.write_clients(STANDARD_CLIENTS);
        for (project, job, body) in STANDARD_JOBS {
            t.write_job(project, job, body);
        }
        t
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn tokens_path(&self) -> PathBuf {
        self.path("config/authorized_tokens")
    }

    pub fn clients_path(&self) -> PathBuf {
        self.path("config/clients.json")
    }

    pub fn jobs_dir(&self) -> PathBuf {
        self.path("jobs")
    }

    pub fn public_key_path(&self) -> PathBuf {
        self.path("keys/server.pub")
    }

    pub fn private_key_path(&self) -> PathBuf {
        self.path("keys/server.key")
    }

    pub fn write_tokens(&self, tokens: &[&str]) {
        let mut contents = String::from("# authorized webhook tokens\n");
        for token in tokens {
            contents.push_str(token);
            contents.push('\n');
        }
        self.write(&self.tokens_path(), &contents);
    }

    pub fn write_clients(&self, clients: &[(&str, &str)]) {
        let mut map = serde_json::Map::new();
        for (token, project) in clients {
            map.insert(
                (*token).to_string(),
                serde_json::json!({ "project": project, "description": "" }),
            );
        }
        let document = serde_json::json!({ "clients": map });
        self.write(
            &self.clients_path(),
            &serde_json::to_string_pretty(&document).unwrap(),
        );
    }

    pub fn write_job(&self, project: &str, job: &str, body: &str) -> PathBuf {
        let path = self.jobs_dir().join(project).join(format!("{}.sh", job));
        self.write(&path, body);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    pub fn write(&self, path: &std::path::Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }

    /// Server state over this workspace's files.
    pub fn state(&self) -> AppState {
        AppState::new(
            CredentialStore::open(self.tokens_path()),
            ProjectDirectory::load(self.clients_path()).unwrap(),
            JobCatalog::new(self.jobs_dir()),
            "bash",
            self.public_key_path(),
        )
    }
}
