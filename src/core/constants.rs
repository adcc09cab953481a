//! Constants used throughout jobhook.
//!
//! Centralizes wire-visible strings and on-disk defaults.

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "jobhook.toml";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_PUBLIC_KEY: &str = "keys/server.pub";
pub const DEFAULT_PRIVATE_KEY: &str = "keys/server.key";
pub const DEFAULT_TOKENS_FILE: &str = "config/authorized_tokens";
pub const DEFAULT_CLIENTS_FILE: &str = "config/clients.json";
pub const DEFAULT_JOBS_DIR: &str = "jobs";
pub const DEFAULT_SHELL: &str = "bash";

/// Extension of runnable job scripts, without the dot.
pub const SCRIPT_EXTENSION: &str = "sh";

/// Request field carrying the caller token (body and query).
pub const TOKEN_FIELD: &str = "token";

/// Dedicated token header. Takes priority over `Authorization`.
pub const TOKEN_HEADER: &str = "x-webhook-token";

/// Required prefix of a bearer `Authorization` header value.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Identification variables exported to every job process.
pub const ENV_PROJECT: &str = "JOB_PROJECT";
pub const ENV_JOB: &str = "JOB_NAME";
pub const ENV_START_TIME: &str = "JOB_START_TIME";

/// Context the HTTP boundary passes to every job it starts.
pub const ENV_EXECUTION_ID: &str = "JOB_EXECUTION_ID";
pub const ENV_CLIENT: &str = "JOB_CLIENT";

/// Hex characters of the SHA-256 digest shown as a token fingerprint.
pub const FINGERPRINT_LEN: usize = 12;

/// Response messages. Clients match on these, so they must not change.
pub mod messages {
    pub const NO_TOKEN_PROVIDED: &str = "Unauthorized: No token provided";
    pub const NO_TOKEN_HINT: &str =
        "Include token in query param, body, or X-Webhook-Token header";
    pub const INVALID_TOKEN: &str = "Forbidden: Invalid or unauthorized token";
    pub const NO_PROJECT_ASSIGNED: &str = "No project assigned to this client";
    pub const NO_PROJECT_ASSIGNED_HINT: &str =
        "Contact administrator to assign a project to your key";
    pub const NO_PROJECT_SPECIFIED: &str = "No project specified";
    pub const NO_PROJECT_SPECIFIED_HINT: &str =
        "Include \"project\" parameter in request body or query";
    pub const NO_JOB_SPECIFIED: &str = "No job specified";
    pub const NO_JOB_SPECIFIED_HINT: &str = "Include \"job\" parameter in request body or query";
    pub const PROJECT_FORBIDDEN_PREFIX: &str = "Not authorized for project: ";
    pub const JOB_NOT_FOUND_PREFIX: &str = "Job not found: ";
    pub const JOB_STARTED: &str = "Job started";
    pub const KEYS_RELOADED: &str = "Keys reloaded";
    pub const RELOAD_FAILED: &str = "Failed to reload keys";
    pub const PUBLIC_KEY_NOT_FOUND: &str = "Public key not found";
    pub const INVALID_BODY: &str = "Invalid request body";
    pub const NOT_FOUND: &str = "Not found";
    pub const INTERNAL_ERROR: &str = "Internal server error";
}
