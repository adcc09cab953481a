//! Error types for jobhook.
//!
//! Errors are grouped by concern. Authorization gate failures (`AuthError`)
//! and job execution failures (`RunError`) are kept out of the top-level
//! `Error` because they are outcomes of a request, not faults of the process.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::core::runner::JobResult;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("key file already exists: {0} (use --force to overwrite)")]
    KeyExists(PathBuf),
}

/// Persistent store errors (tokens file, clients document).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} already exists")]
    AlreadyExists(PathBuf),

    #[error("malformed clients document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Input validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("invalid {kind} name '{name}': only A-Z, a-z, 0-9, '_' and '-' are allowed")]
    UnsafeName { kind: &'static str, name: String },

    #[error("token cannot be empty")]
    EmptyToken,
}

/// A request parameter the pipeline requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Project,
    Job,
}

impl Parameter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Job => "job",
        }
    }
}

/// Authorization pipeline gate failures.
///
/// Each variant corresponds to exactly one gate outcome and one HTTP status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token in body, query, or either header form.
    #[error("no token provided")]
    NoToken,

    /// A token was presented but is not in the authorized set.
    #[error("invalid or unauthorized token")]
    InvalidToken,

    /// The caller is authenticated but has no project assignment.
    #[error("no project assigned to this client")]
    NoProjectAssigned,

    #[error("no {} specified", .0.as_str())]
    MissingParameter(Parameter),

    /// The caller asked for a project other than its assigned one.
    #[error("not authorized for project: {requested}")]
    ProjectForbidden { requested: String, assigned: String },

    #[error("job not found: {job}")]
    JobNotFound {
        project: String,
        job: String,
        available: Vec<String>,
    },
}

/// Job execution failures.
#[derive(Error, Debug)]
pub enum RunError {
    /// The job does not exist; nothing was spawned.
    #[error("job not found: {project}/{job}")]
    NotFound { project: String, job: String },

    /// The process ran and exited unsuccessfully. Carries the full result.
    #[error("job {}/{} failed with exit code {}", .0.project, .0.job, display_code(.0.exit_code))]
    Failed(Box<JobResult>),

    /// The process could not be spawned or awaited.
    #[error("failed to run job {project}/{job}: {message}")]
    Spawn {
        project: String,
        job: String,
        start_time: DateTime<Utc>,
        duration_ms: u64,
        message: String,
    },
}

fn display_code(code: Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_string(), |c| c.to_string())
}

pub type Result<T> = std::result::Result<T, Error>;
