//! Request handlers.

use std::any::Any;

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::core::constants::{messages, ENV_CLIENT, ENV_EXECUTION_ID};
use crate::core::keys;
use crate::core::pipeline::{self, Authorized};
use crate::core::runner::RunOptions;
use crate::error::RunError;
use crate::server::error::{error_response, ApiError};
use crate::server::params;
use crate::server::AppState;

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": timestamp() }))
}

/// GET /public-key
pub async fn public_key(State(state): State<AppState>) -> Result<Response, ApiError> {
    match keys::read_public(&state.public_key) {
        Ok(Some(key)) => Ok((
            StatusCode::OK,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            key,
        )
            .into_response()),
        Ok(None) => Err(ApiError::PublicKeyNotFound),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

/// GET /jobs: the caller's project and its jobs.
pub async fn list_jobs(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let params = params::extract(&headers, query.as_deref(), &body)?;
    let caller = pipeline::authenticate(&params, &*state.tokens)?;
    let project = pipeline::assigned_project(&caller, &*state.directory)?;
    let jobs = state.catalog.list_jobs(&project);

    Ok(Json(json!({
        "status": "ok",
        "project": project,
        "jobs": jobs,
    })))
}

/// POST /webhook: authorize, start the job in the background, answer
/// immediately.
pub async fn webhook(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let params = params::extract(&headers, query.as_deref(), &body)?;
    let authorized = pipeline::authorize(
        &params,
        &*state.tokens,
        &*state.directory,
        &*state.catalog,
    )?;

    info!(
        client = %authorized.caller.fingerprint(),
        project = %authorized.project,
        job = %authorized.job,
        "job accepted"
    );
    spawn_job(&state, &authorized);

    Ok(Json(json!({
        "status": "accepted",
        "message": messages::JOB_STARTED,
        "project": authorized.project,
        "job": authorized.job,
        "timestamp": timestamp(),
    })))
}

/// Run the job on a detached task. Its outcome goes to the log and, if
/// configured, the outcome channel; never to the client.
fn spawn_job(state: &AppState, authorized: &Authorized) {
    let execution_id = Uuid::new_v4();
    let span = info_span!(
        "job",
        id = %execution_id,
        project = %authorized.project,
        job = %authorized.job,
    );

    let runner = state.runner.clone();
    let outcomes = state.outcomes.clone();
    let project = authorized.project.clone();
    let job = authorized.job.clone();
    let options = RunOptions::new()
        .env(ENV_EXECUTION_ID, execution_id.to_string())
        .env(ENV_CLIENT, authorized.caller.fingerprint())
        .on_output(|stream, text| {
            for line in text.lines() {
                info!(stream = stream.as_str(), "{}", line);
            }
        });

    tokio::spawn(
        async move {
            let outcome = runner.execute(&project, &job, options).await;
            match &outcome {
                Ok(result) => info!(
                    exit_code = ?result.exit_code,
                    duration_ms = result.duration_ms,
                    "job succeeded"
                ),
                Err(RunError::Failed(result)) => error!(
                    exit_code = ?result.exit_code,
                    duration_ms = result.duration_ms,
                    stderr = %result.stderr,
                    "job failed"
                ),
                Err(e) => error!(error = %e, "job could not run"),
            }
            if let Some(tx) = outcomes {
                // The receiver may be gone; the log already has the outcome.
                let _ = tx.send(outcome);
            }
        }
        .instrument(span),
    );
}

/// POST /admin/reload-keys: re-read tokens and client assignments.
pub async fn reload_keys(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let params = params::extract(&headers, query.as_deref(), &body)?;
    let caller = pipeline::authenticate(&params, &*state.tokens)?;
    info!(client = %caller.fingerprint(), "reload requested");

    let tokens = state.tokens.reload().map_err(|_| ApiError::ReloadFailed)?;
    let clients = state.directory.reload().map_err(|e| {
        error!(error = %e, "clients reload failed, keeping previous assignments");
        ApiError::ReloadFailed
    })?;

    Ok(Json(json!({
        "status": "ok",
        "message": messages::KEYS_RELOADED,
        "tokens": tokens,
        "clients": clients,
    })))
}

/// Unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Response for a handler that panicked.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(panic = %detail, "handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, messages::INTERNAL_ERROR)
}
