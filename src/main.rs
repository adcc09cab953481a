//! Jobhook - run project jobs from authenticated webhooks.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jobhook::cli::output;
use jobhook::cli::{execute, Cli, Command};
use jobhook::core::config::LogFormat;
use jobhook::error::{ConfigError, Error, StoreError};

fn main() {
    let cli = Cli::parse();

    let settings = match cli.settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    let filter = EnvFilter::try_from_env("JOBHOOK_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("jobhook=debug,tower_http=debug")
        } else if matches!(cli.command, Command::Serve(_)) {
            EnvFilter::new("jobhook=info")
        } else {
            EnvFilter::new("jobhook=warn")
        }
    });

    let (text, json) = match settings.log_format {
        LogFormat::Text => (
            Some(fmt::layer().with_target(false).with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (None, Some(fmt::layer().json().with_writer(std::io::stderr))),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .init();

    if let Err(e) = execute(cli.command, &settings) {
        fail(&e);
    }
}

fn fail(e: &Error) -> ! {
    let suggestion = match e {
        Error::Config(ConfigError::InvalidValue { field: "port", .. }) => {
            Some("set --port or JOBHOOK_PORT to a value between 1 and 65535")
        }
        Error::Config(ConfigError::KeyExists(_)) => Some("run: jobhook keygen --force"),
        Error::Store(StoreError::Parse { .. }) => Some("fix the JSON or remove the clients file"),
        _ => None,
    };

    output::error(&e.to_string());
    if let Some(hint) = suggestion {
        output::hint(hint);
    }
    std::process::exit(1);
}
