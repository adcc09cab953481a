//! Error responses for the HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use thiserror::Error;

use crate::core::constants::messages;
use crate::error::{AuthError, Parameter};

impl AuthError {
    /// HTTP status for this gate failure.
    ///
    /// An absent token is 401; a presented but unknown token is 403.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NoToken => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::NoProjectAssigned | Self::ProjectForbidden { .. } => {
                StatusCode::FORBIDDEN
            }
            Self::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Self::JobNotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// JSON body for this gate failure.
    pub fn body(&self) -> Value {
        match self {
            Self::NoToken => json!({
                "status": "error",
                "message": messages::NO_TOKEN_PROVIDED,
                "hint": messages::NO_TOKEN_HINT,
            }),
            Self::InvalidToken => json!({
                "status": "error",
                "message": messages::INVALID_TOKEN,
            }),
            Self::NoProjectAssigned => json!({
                "status": "error",
                "message": messages::NO_PROJECT_ASSIGNED,
                "hint": messages::NO_PROJECT_ASSIGNED_HINT,
            }),
            Self::MissingParameter(Parameter::Project) => json!({
                "status": "error",
                "message": messages::NO_PROJECT_SPECIFIED,
                "hint": messages::NO_PROJECT_SPECIFIED_HINT,
            }),
            Self::MissingParameter(Parameter::Job) => json!({
                "status": "error",
                "message": messages::NO_JOB_SPECIFIED,
                "hint": messages::NO_JOB_SPECIFIED_HINT,
            }),
            Self::ProjectForbidden {
                requested,
                assigned,
            } => json!({
                "status": "error",
                "message": format!("{}{}", messages::PROJECT_FORBIDDEN_PREFIX, requested),
                "assignedProject": assigned,
            }),
            Self::JobNotFound {
                project,
                job,
                available,
            } => json!({
                "status": "error",
                "message": format!("{}{}", messages::JOB_NOT_FOUND_PREFIX, job),
                "project": project,
                "availableJobs": available,
            }),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}

/// Errors raised by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The body declared JSON or form content but did not parse.
    #[error("invalid request body")]
    InvalidBody,

    #[error("key reload failed")]
    ReloadFailed,

    #[error("public key not found")]
    PublicKeyNotFound,

    #[error("route not found")]
    NotFound,

    /// Never shown to clients beyond a generic message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Auth(e) => e.status_code(),
            Self::InvalidBody => StatusCode::BAD_REQUEST,
            Self::PublicKeyNotFound | Self::NotFound => StatusCode::NOT_FOUND,
            Self::ReloadFailed | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Auth(e) => return e.clone().into_response(),
            Self::InvalidBody => messages::INVALID_BODY,
            Self::ReloadFailed => messages::RELOAD_FAILED,
            Self::PublicKeyNotFound => messages::PUBLIC_KEY_NOT_FOUND,
            Self::NotFound => messages::NOT_FOUND,
            Self::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                messages::INTERNAL_ERROR
            }
        };
        error_response(self.status_code(), message)
    }
}

/// `{status:"error", message}` with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
}
