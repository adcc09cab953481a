//! Job Runner.
//!
//! Spawns a job script as `<shell> <script>` in the script's directory and
//! streams its output. The child inherits the server environment, overlaid
//! first with caller-supplied variables and then with the fixed
//! identification variables, which always win.
//!
//! The runner imposes no timeout and never kills the child.

use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::core::catalog::JobCatalog;
use crate::core::constants::{self, ENV_JOB, ENV_PROJECT, ENV_START_TIME};
use crate::core::types::{JobName, ProjectName};
use crate::error::RunError;

const CHUNK_SIZE: usize = 8192;

/// Which output stream a chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl OutputStream {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

/// Callback invoked for every chunk of output as it arrives.
pub type OutputCallback = Box<dyn FnMut(OutputStream, &str) + Send>;

/// Per-execution options.
#[derive(Default)]
pub struct RunOptions {
    env: HashMap<String, String>,
    on_output: Option<OutputCallback>,
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an environment variable for the child. Cannot override the
    /// identification variables.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Add several environment variables.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Receive output chunks as they are read.
    pub fn on_output<F>(mut self, callback: F) -> Self
    where
        F: FnMut(OutputStream, &str) + Send + 'static,
    {
        self.on_output = Some(Box::new(callback));
        self
    }
}

/// Outcome of one job execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub project: ProjectName,
    pub job: JobName,
    /// `None` if the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    pub stdout: String,
    pub stderr: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Executes jobs from a catalog.
#[derive(Debug, Clone)]
pub struct JobRunner {
    catalog: Arc<JobCatalog>,
    shell: String,
}

impl JobRunner {
    /// Create a runner that executes scripts with `shell`.
    pub fn new(catalog: Arc<JobCatalog>, shell: impl Into<String>) -> Self {
        Self {
            catalog,
            shell: shell.into(),
        }
    }

    /// Runner using the default interpreter.
    pub fn with_default_shell(catalog: Arc<JobCatalog>) -> Self {
        Self::new(catalog, constants::DEFAULT_SHELL)
    }

    /// Run a job to completion.
    ///
    /// # Errors
    ///
    /// - `RunError::NotFound` if the job does not exist; nothing is spawned.
    /// - `RunError::Spawn` if the interpreter cannot be started or awaited.
    /// - `RunError::Failed` with the full result if the exit code is not 0.
    pub async fn execute(
        &self,
        project: &str,
        job: &str,
        options: RunOptions,
    ) -> Result<JobResult, RunError> {
        let not_found = || RunError::NotFound {
            project: project.to_string(),
            job: job.to_string(),
        };
        let script = self.catalog.script_path(project, job).ok_or_else(not_found)?;
        let cwd = script.parent().ok_or_else(not_found)?.to_path_buf();

        let RunOptions { env, mut on_output } = options;
        let start_time = Utc::now();
        let started = Instant::now();

        let spawn_error = |message: String| RunError::Spawn {
            project: project.to_string(),
            job: job.to_string(),
            start_time,
            duration_ms: elapsed_ms(started),
            message,
        };

        let mut cmd = Command::new(&self.shell);
        cmd.arg(&script)
            .current_dir(&cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false)
            .envs(&env)
            .env(ENV_PROJECT, project)
            .env(ENV_JOB, job)
            .env(
                ENV_START_TIME,
                start_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            );

        debug!(script = %script.display(), shell = %self.shell, "spawning job");
        let mut child = cmd.spawn().map_err(|e| spawn_error(e.to_string()))?;
        let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take())
        else {
            return Err(spawn_error("child output was not captured".to_string()));
        };

        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();
        let mut stdout_chunk = [0u8; CHUNK_SIZE];
        let mut stderr_chunk = [0u8; CHUNK_SIZE];
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                read = stdout.read(&mut stdout_chunk), if stdout_open => match read {
                    Ok(0) => stdout_open = false,
                    Err(e) => {
                        warn!(project, job, error = %e, "failed to read job stdout");
                        stdout_open = false;
                    }
                    Ok(n) => {
                        let chunk = &stdout_chunk[..n];
                        stdout_buf.extend_from_slice(chunk);
                        if let Some(callback) = on_output.as_mut() {
                            callback(OutputStream::Stdout, &String::from_utf8_lossy(chunk));
                        }
                    }
                },
                read = stderr.read(&mut stderr_chunk), if stderr_open => match read {
                    Ok(0) => stderr_open = false,
                    Err(e) => {
                        warn!(project, job, error = %e, "failed to read job stderr");
                        stderr_open = false;
                    }
                    Ok(n) => {
                        let chunk = &stderr_chunk[..n];
                        stderr_buf.extend_from_slice(chunk);
                        if let Some(callback) = on_output.as_mut() {
                            callback(OutputStream::Stderr, &String::from_utf8_lossy(chunk));
                        }
                    }
                },
            }
        }

        let status = child.wait().await.map_err(|e| spawn_error(e.to_string()))?;
        let exit_code = status.code();

        let result = JobResult {
            project: project.to_string(),
            job: job.to_string(),
            exit_code,
            success: exit_code == Some(0),
            duration_ms: elapsed_ms(started),
            stdout: String::from_utf8_lossy(&stdout_buf).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
            start_time,
            end_time: Utc::now(),
        };

        info!(
            project,
            job,
            exit_code = ?result.exit_code,
            duration_ms = result.duration_ms,
            "job finished"
        );

        if result.success {
            Ok(result)
        } else {
            Err(RunError::Failed(Box::new(result)))
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
