//! Input validation for jobhook operations.
//!
//! Validates project names, job names and tokens.

use crate::error::{Result, ValidationError};

/// Check whether a name is safe to use as a single path segment.
///
/// Safe names match `^[A-Za-z0-9_-]+$`: no dots, no separators, never empty.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

/// Validate a project name.
///
/// # Errors
///
/// Returns `ValidationError::UnsafeName` if the name is not a safe name.
pub fn validate_project(name: &str) -> Result<()> {
    validate_name("project", name)
}

/// Validate a job name.
///
/// # Errors
///
/// Returns `ValidationError::UnsafeName` if the name is not a safe name.
pub fn validate_job(name: &str) -> Result<()> {
    validate_name("job", name)
}

/// Validate a token for administrative storage.
///
/// Tokens are stored one per line, so a token must be non-empty after
/// trimming and must not span lines.
///
/// # Errors
///
/// Returns `ValidationError::EmptyToken` for blank input.
pub fn validate_token(token: &str) -> Result<()> {
    if token.trim().is_empty() || token.trim().contains('\n') {
        return Err(ValidationError::EmptyToken.into());
    }
    Ok(())
}

fn validate_name(kind: &'static str, name: &str) -> Result<()> {
    if !is_safe_name(name) {
        return Err(ValidationError::UnsafeName {
            kind,
            name: name.to_string(),
        }
        .into());
    }
    Ok(())
}
