//! Serve command.

use clap::Args;

use crate::core::config::{LogFormat, Overrides, Settings};
use crate::error::Result;
use crate::server;

/// Listener and runtime options for `jobhook serve`.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "JOBHOOK_HOST")]
    pub host: Option<String>,

    /// Port to listen on (1-65535)
    #[arg(short, long, env = "JOBHOOK_PORT")]
    pub port: Option<u32>,

    /// Deployment environment label, reported at startup
    #[arg(long = "env", env = "JOBHOOK_ENV", value_name = "NAME")]
    pub environment: Option<String>,

    /// Interpreter used to run job scripts
    #[arg(long, env = "JOBHOOK_SHELL")]
    pub shell: Option<String>,

    /// Log output format
    #[arg(long, value_enum, env = "JOBHOOK_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,
}

impl ServeArgs {
    /// Copy the flags that were given into `overrides`.
    pub fn apply(&self, overrides: &mut Overrides) {
        overrides.host = self.host.clone();
        overrides.port = self.port;
        overrides.environment = self.environment.clone();
        overrides.shell = self.shell.clone();
        overrides.log_format = self.log_format;
    }
}

/// Run the server until interrupted.
pub fn execute(settings: &Settings) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(settings))
}
