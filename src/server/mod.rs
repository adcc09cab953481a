//! HTTP boundary.
//!
//! ```text
//! GET  /health             liveness
//! GET  /public-key         server public key text
//! GET  /jobs               caller's project and job list      (token)
//! POST /webhook            start a job, fire-and-forget       (token, project, job)
//! POST /admin/reload-keys  reload tokens and assignments      (token)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::core::catalog::JobCatalog;
use crate::core::config::Settings;
use crate::core::credentials::CredentialStore;
use crate::core::directory::ProjectDirectory;
use crate::core::runner::{JobResult, JobRunner};
use crate::error::{Error, Result, RunError};

pub mod error;
pub mod handlers;
pub mod params;

/// Outcome of a background job, as delivered to an observer.
pub type JobOutcome = std::result::Result<JobResult, RunError>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<CredentialStore>,
    pub directory: Arc<ProjectDirectory>,
    pub catalog: Arc<JobCatalog>,
    pub runner: Arc<JobRunner>,
    pub public_key: PathBuf,
    /// Optional server-side observer of finished jobs.
    pub outcomes: Option<mpsc::UnboundedSender<JobOutcome>>,
}

impl AppState {
    pub fn new(
        tokens: CredentialStore,
        directory: ProjectDirectory,
        catalog: JobCatalog,
        shell: impl Into<String>,
        public_key: impl Into<PathBuf>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        Self {
            tokens: Arc::new(tokens),
            directory: Arc::new(directory),
            runner: Arc::new(JobRunner::new(Arc::clone(&catalog), shell)),
            catalog,
            public_key: public_key.into(),
            outcomes: None,
        }
    }

    /// Build state from settings, loading both stores.
    ///
    /// Store problems are logged; the server still starts.
    pub fn from_settings(settings: &Settings) -> Self {
        let tokens = CredentialStore::open(&settings.tokens);
        let directory = ProjectDirectory::load(&settings.clients).unwrap_or_else(|e| {
            error!(error = %e, "failed to load clients document, starting with no assignments");
            ProjectDirectory::empty(&settings.clients)
        });
        Self::new(
            tokens,
            directory,
            JobCatalog::new(&settings.jobs_dir),
            settings.shell.clone(),
            &settings.public_key,
        )
    }

    /// Send every finished job's outcome to the returned receiver.
    pub fn with_outcomes(mut self) -> (Self, mpsc::UnboundedReceiver<JobOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outcomes = Some(tx);
        (self, rx)
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/public-key", get(handlers::public_key))
        .route("/jobs", get(handlers::list_jobs))
        .route("/webhook", post(handlers::webhook))
        .route("/admin/reload-keys", post(handlers::reload_keys))
        .fallback(handlers::not_found)
        .layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
///
/// # Errors
///
/// Returns `Error::Server` if the address cannot be bound or the server
/// fails.
pub async fn serve(settings: &Settings) -> Result<()> {
    settings.check_environment();
    let state = AppState::from_settings(settings);
    let app = router(state);

    let addr = settings.addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("failed to bind {}: {}", addr, e)))?;

    info!(
        addr = %addr,
        environment = %settings.environment,
        jobs_dir = %settings.jobs_dir.display(),
        "jobhook listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))?;

    info!("jobhook stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
