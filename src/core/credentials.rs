//! Credential Store.
//!
//! Holds the allow-list of caller tokens loaded from a newline-delimited
//! file. Blank lines and lines starting with `#` are ignored. The in-memory
//! set is replaced wholesale on reload; readers always see one complete set.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::{debug, error, info, warn};

use crate::core::constants;
use crate::core::persist;
use crate::core::validation;
use crate::error::Result;

/// Parse tokens file contents into a set of trimmed entries.
pub fn parse(contents: &str) -> HashSet<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load the token set from disk.
///
/// A missing file yields an empty set.
///
/// # Errors
///
/// Returns `StoreError::Read` if the file exists but cannot be read.
pub fn load(path: &Path) -> Result<HashSet<String>> {
    debug!(path = %path.display(), "loading authorized tokens");
    match persist::read_optional(path)? {
        Some(contents) => Ok(parse(&contents)),
        None => {
            warn!(path = %path.display(), "authorized tokens file not found, no caller will be accepted");
            Ok(HashSet::new())
        }
    }
}

/// Exact membership test after trimming the presented token.
pub fn verify(token: &str, tokens: &HashSet<String>) -> bool {
    let token = token.trim();
    !token.is_empty() && tokens.contains(token)
}

/// Short, log-safe identifier for a token.
///
/// First hex characters of the SHA-256 of the trimmed token.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.trim().as_bytes());
    let mut hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(constants::FINGERPRINT_LEN);
    hex
}

/// Process-wide token allow-list with reload support.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    tokens: RwLock<Arc<HashSet<String>>>,
}

impl CredentialStore {
    /// Open the store at `path`, loading the current file.
    ///
    /// Never fails: an unreadable file is logged and leaves the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: path.into(),
            tokens: RwLock::new(Arc::new(HashSet::new())),
        };
        if let Err(e) = store.reload() {
            error!(error = %e, "failed to load authorized tokens");
        }
        store
    }

    /// Build a store from an in-memory list, not backed by a readable file.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            path: PathBuf::new(),
            tokens: RwLock::new(Arc::new(set)),
        }
    }

    /// Re-read the tokens file and swap in the new set.
    ///
    /// On failure the store degrades to an empty set (reject everything)
    /// and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Read` if the file exists but cannot be read.
    pub fn reload(&self) -> Result<usize> {
        match load(&self.path) {
            Ok(set) => {
                let count = set.len();
                *self.tokens.write() = Arc::new(set);
                info!(count, "authorized tokens loaded");
                Ok(count)
            }
            Err(e) => {
                *self.tokens.write() = Arc::new(HashSet::new());
                error!(error = %e, "token reload failed, rejecting all callers");
                Err(e)
            }
        }
    }

    /// Check a presented token against the current set.
    pub fn verify(&self, token: &str) -> bool {
        let tokens = self.tokens.read().clone();
        verify(token, &tokens)
    }

    /// Number of tokens in the current set.
    pub fn len(&self) -> usize {
        self.tokens.read().len()
    }

    /// Whether the current set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Append a token to the tokens file.
///
/// Returns `false` without writing if the token is already present.
///
/// # Errors
///
/// Returns `ValidationError::EmptyToken` for blank tokens, or a store error
/// if the file cannot be read or written.
pub fn add(path: &Path, token: &str) -> Result<bool> {
    validation::validate_token(token)?;
    let token = token.trim();

    let mut contents = persist::read_optional(path)?.unwrap_or_default();
    if parse(&contents).contains(token) {
        return Ok(false);
    }

    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(token);
    contents.push('\n');
    persist::write_atomic(path, &contents)?;

    Ok(true)
}

/// Remove every line matching a token from the tokens file.
///
/// Comments and unrelated lines are preserved. Returns whether anything
/// was removed.
///
/// # Errors
///
/// Returns `ValidationError::EmptyToken` for blank tokens, or a store error
/// if the file cannot be read or written.
pub fn remove(path: &Path, token: &str) -> Result<bool> {
    validation::validate_token(token)?;
    let token = token.trim();
    let Some(contents) = persist::read_optional(path)? else {
        return Ok(false);
    };

    let kept: Vec<&str> = contents
        .lines()
        .filter(|line| {
            let line = line.trim();
            line.starts_with('#') || line != token
        })
        .collect();
    if kept.len() == contents.lines().count() {
        return Ok(false);
    }

    let mut updated = kept.join("\n");
    if !updated.is_empty() {
        updated.push('\n');
    }
    persist::write_atomic(path, &updated)?;

    Ok(true)
}
