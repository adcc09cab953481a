//! Server key material.
//!
//! Generates the server's age x25519 key pair and reads the public half for
//! the `/public-key` endpoint.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use age::secrecy::ExposeSecret;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{ConfigError, Result, StoreError};

/// Generate a key pair and write both halves.
///
/// The private key file is restricted to 0600 on Unix. Returns the public
/// key string (`age1...`).
///
/// # Errors
///
/// Returns `ConfigError::KeyExists` if either file exists and `force` is
/// false, or a store error if writing fails.
pub fn generate(private_path: &Path, public_path: &Path, force: bool) -> Result<String> {
    if !force {
        for path in [private_path, public_path] {
            if path.exists() {
                return Err(ConfigError::KeyExists(path.to_path_buf()).into());
            }
        }
    }

    let identity = age::x25519::Identity::generate();
    let public_key = identity.to_public().to_string();
    let secret = Zeroizing::new(identity.to_string().expose_secret().to_string());

    write_private(private_path, &format!("{}\n", secret.as_str()))?;
    write_file(public_path, &format!("{}\n", public_key))?;

    debug!(public = %public_path.display(), "server key pair written");
    Ok(public_key)
}

/// Read the public key text, or `None` if the file is absent.
///
/// # Errors
///
/// Returns `StoreError::Read` if the file exists but cannot be read.
pub fn read_public(path: &Path) -> Result<Option<String>> {
    crate::core::persist::read_optional(path)
}

fn create_parent(path: &Path) -> std::io::Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent),
        None => Ok(()),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    create_parent(path).map_err(write_err)?;
    fs::write(path, contents).map_err(write_err)?;
    Ok(())
}

/// Write a file that only the owner can read. The mode is set before any
/// content is written, including when replacing an existing file.
fn write_private(path: &Path, contents: &str) -> Result<()> {
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    create_parent(path).map_err(write_err)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path).map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(write_err)?;
    }
    file.write_all(contents.as_bytes()).map_err(write_err)?;
    Ok(())
}
