//! Token management commands.
//!
//! Tokens are never echoed back; listings show fingerprints.

use serde_json::json;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::credentials;
use crate::error::Result;

/// Authorize a token.
pub fn add(settings: &Settings, token: &str) -> Result<()> {
    let fingerprint = credentials::fingerprint(token.trim());
    if credentials::add(&settings.tokens, token)? {
        output::success(&format!("token {} authorized", fingerprint));
        output::hint("reload a running server: POST /admin/reload-keys");
    } else {
        output::warn(&format!("token {} is already authorized", fingerprint));
    }
    Ok(())
}

/// Revoke a token.
pub fn rm(settings: &Settings, token: &str) -> Result<()> {
    let fingerprint = credentials::fingerprint(token.trim());
    if credentials::remove(&settings.tokens, token)? {
        output::success(&format!("token {} revoked", fingerprint));
    } else {
        output::warn(&format!("token {} was not authorized", fingerprint));
    }
    Ok(())
}

/// List authorized tokens.
pub fn list(settings: &Settings, json: bool) -> Result<()> {
    let mut fingerprints: Vec<String> = credentials::load(&settings.tokens)?
        .iter()
        .map(|token| credentials::fingerprint(token))
        .collect();
    fingerprints.sort();

    if json {
        let value = json!({ "count": fingerprints.len(), "tokens": fingerprints });
        output::data(&serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if fingerprints.is_empty() {
        output::dimmed("no tokens authorized");
    } else {
        output::header(&format!("{} authorized tokens", fingerprints.len()));
        for fingerprint in &fingerprints {
            output::list_item(fingerprint);
        }
    }
    Ok(())
}
