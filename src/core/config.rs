//! Server configuration.
//!
//! Settings come from three layers, highest precedence first: command-line
//! flags and their environment variables, the optional `jobhook.toml`
//! file, then built-in defaults.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Contents of `jobhook.toml`. Every field is optional.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub port: Option<u32>,
    pub environment: Option<String>,
    pub public_key: Option<PathBuf>,
    pub private_key: Option<PathBuf>,
    pub tokens: Option<PathBuf>,
    pub clients: Option<PathBuf>,
    pub jobs_dir: Option<PathBuf>,
    pub shell: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl FileConfig {
    /// Load a config file.
    ///
    /// With an explicit path the file must exist. Without one,
    /// `jobhook.toml` in the working directory is used if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(constants::CONFIG_FILE);
                if !default.exists() {
                    debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::ReadFile {
            path: path.clone(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse TOML config text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` if the TOML is malformed.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents).map_err(ConfigError::Parse)?)
    }
}

/// Values supplied on the command line or through environment variables.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u32>,
    pub environment: Option<String>,
    pub public_key: Option<PathBuf>,
    pub private_key: Option<PathBuf>,
    pub tokens: Option<PathBuf>,
    pub clients: Option<PathBuf>,
    pub jobs_dir: Option<PathBuf>,
    pub shell: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub environment: String,
    pub public_key: PathBuf,
    pub private_key: PathBuf,
    pub tokens: PathBuf,
    pub clients: PathBuf,
    pub jobs_dir: PathBuf,
    pub shell: String,
    pub log_format: LogFormat,
}

impl Settings {
    /// Merge the layers and validate the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unparseable host or a port
    /// outside 1..=65535.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let host = overrides
            .host
            .or(file.host)
            .unwrap_or_else(|| constants::DEFAULT_HOST.to_string());
        let host: IpAddr = host.parse().map_err(|_| ConfigError::InvalidValue {
            field: "host",
            reason: format!("not an IP address: {}", host),
        })?;

        let port = overrides
            .port
            .or(file.port)
            .unwrap_or(u32::from(constants::DEFAULT_PORT));

        Ok(Self {
            host,
            port: validate_port(port)?,
            environment: overrides
                .environment
                .or(file.environment)
                .unwrap_or_else(|| constants::DEFAULT_ENVIRONMENT.to_string()),
            public_key: overrides
                .public_key
                .or(file.public_key)
                .unwrap_or_else(|| constants::DEFAULT_PUBLIC_KEY.into()),
            private_key: overrides
                .private_key
                .or(file.private_key)
                .unwrap_or_else(|| constants::DEFAULT_PRIVATE_KEY.into()),
            tokens: overrides
                .tokens
                .or(file.tokens)
                .unwrap_or_else(|| constants::DEFAULT_TOKENS_FILE.into()),
            clients: overrides
                .clients
                .or(file.clients)
                .unwrap_or_else(|| constants::DEFAULT_CLIENTS_FILE.into()),
            jobs_dir: overrides
                .jobs_dir
                .or(file.jobs_dir)
                .unwrap_or_else(|| constants::DEFAULT_JOBS_DIR.into()),
            shell: overrides
                .shell
                .or(file.shell)
                .unwrap_or_else(|| constants::DEFAULT_SHELL.to_string()),
            log_format: overrides.log_format.or(file.log_format).unwrap_or_default(),
        })
    }

    /// Socket address to bind.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Report missing files and tools. None of these stop startup.
    ///
    /// Returns the warnings so callers can surface them.
    pub fn check_environment(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        let files = [
            ("public key", &self.public_key),
            ("private key", &self.private_key),
            ("authorized tokens file", &self.tokens),
            ("clients document", &self.clients),
        ];
        for (what, path) in files {
            if !path.is_file() {
                warnings.push(format!("{} not found: {}", what, path.display()));
            }
        }
        if !self.jobs_dir.is_dir() {
            warnings.push(format!("jobs directory not found: {}", self.jobs_dir.display()));
        }
        if which::which(&self.shell).is_err() {
            warnings.push(format!("job interpreter not found on PATH: {}", self.shell));
        }

        for warning in &warnings {
            warn!("{}", warning);
        }
        warnings
    }
}

/// Check a port number.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for 0 or anything above 65535.
pub fn validate_port(port: u32) -> Result<u16> {
    match u16::try_from(port) {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(ConfigError::InvalidValue {
            field: "port",
            reason: format!("must be between 1 and 65535, got {}", port),
        }
        .into()),
    }
}
