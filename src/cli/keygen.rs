//! Keygen command - create the server key pair.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::keys;
use crate::error::Result;

/// Generate and write the server key pair.
pub fn execute(settings: &Settings, force: bool) -> Result<()> {
    let public_key = keys::generate(&settings.private_key, &settings.public_key, force)?;

    output::success("server key pair generated");
    output::kv("public key: ", &public_key);
    output::kv("public file:", output::path(&settings.public_key));
    output::kv("private file:", output::path(&settings.private_key));
    Ok(())
}
