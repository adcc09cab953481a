//! Request parameter extraction.
//!
//! Turns the raw pieces of an HTTP request into [`RequestParams`] for the
//! authorization pipeline. Only string values are kept.

use std::collections::HashMap;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::HeaderMap;
use serde_json::Value;

use crate::core::constants::TOKEN_HEADER;
use crate::core::pipeline::RequestParams;
use crate::server::error::ApiError;

/// Build pipeline parameters from headers, the raw query string and body.
///
/// # Errors
///
/// Returns `ApiError::InvalidBody` if the body declares JSON or form
/// content and does not parse.
pub fn extract(
    headers: &HeaderMap,
    query: Option<&str>,
    body: &[u8],
) -> Result<RequestParams, ApiError> {
    Ok(RequestParams {
        body: parse_body(headers, body)?,
        query: parse_query(query),
        token_header: header_str(headers, TOKEN_HEADER),
        authorization: header_str(headers, AUTHORIZATION.as_str()),
    })
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default()
}

fn parse_body(headers: &HeaderMap, body: &[u8]) -> Result<HashMap<String, String>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(HashMap::new());
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let value: Value = serde_json::from_slice(body).map_err(|_| ApiError::InvalidBody)?;
        return Ok(string_fields(value));
    }
    if content_type.starts_with("application/x-www-form-urlencoded") {
        return serde_urlencoded::from_bytes(body).map_err(|_| ApiError::InvalidBody);
    }

    // Other content types are not parsed.
    Ok(HashMap::new())
}

fn string_fields(value: Value) -> HashMap<String, String> {
    match value {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect(),
        _ => HashMap::new(),
    }
}
