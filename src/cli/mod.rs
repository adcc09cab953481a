//! Command-line interface.

pub mod completions;
pub mod jobs;
pub mod keygen;
pub mod output;
pub mod project;
pub mod serve;
pub mod token;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::{FileConfig, Overrides, Settings};
use crate::error::Result;

/// Jobhook - run project jobs from authenticated webhooks.
#[derive(Parser)]
#[command(
    name = "jobhook",
    about = "Run project jobs from authenticated webhooks",
    version
)]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to ./jobhook.toml when present)
    #[arg(long, global = true, env = "JOBHOOK_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub paths: PathArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// File locations shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Authorized tokens file
    #[arg(long, global = true, env = "JOBHOOK_AUTHORIZED_TOKENS", value_name = "FILE")]
    pub tokens: Option<PathBuf>,

    /// Clients document mapping tokens to projects
    #[arg(long, global = true, env = "JOBHOOK_CLIENTS", value_name = "FILE")]
    pub clients: Option<PathBuf>,

    /// Root directory of job scripts
    #[arg(long, global = true, env = "JOBHOOK_JOBS_DIR", value_name = "DIR")]
    pub jobs_dir: Option<PathBuf>,

    /// Server public key file
    #[arg(long, global = true, env = "JOBHOOK_PUBLIC_KEY", value_name = "FILE")]
    pub public_key: Option<PathBuf>,

    /// Server private key file
    #[arg(long, global = true, env = "JOBHOOK_PRIVATE_KEY", value_name = "FILE")]
    pub private_key: Option<PathBuf>,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Start the webhook server
    Serve(serve::ServeArgs),

    /// Generate the server key pair
    Keygen {
        /// Overwrite existing key files
        #[arg(short, long)]
        force: bool,
    },

    /// Manage authorized tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage token-to-project assignments
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// List the jobs of a project
    Jobs {
        /// Project name
        project: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Token subcommands.
#[derive(Subcommand)]
pub enum TokenAction {
    /// Authorize a token
    Add {
        /// Token value
        token: String,
    },

    /// Revoke a token
    Rm {
        /// Token value
        token: String,
    },

    /// List authorized tokens by fingerprint
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Project subcommands.
#[derive(Subcommand)]
pub enum ProjectAction {
    /// Assign a token to a project, replacing any previous assignment
    Assign {
        /// Token value
        token: String,
        /// Project name
        project: String,
        /// Free-form description of the client
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Remove a token's assignment
    Rm {
        /// Token value
        token: String,
    },

    /// List assignments
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a project directory with a starter job script
    Init {
        /// Project name
        project: String,
        /// Job name
        #[arg(long, default_value = "deploy")]
        job: String,
    },
}

impl Cli {
    /// Resolve settings from flags, environment, config file and defaults.
    ///
    /// # Errors
    ///
    /// Returns a config error for an unreadable config file or an invalid
    /// value such as an out-of-range port.
    pub fn settings(&self) -> Result<Settings> {
        let file = FileConfig::load(self.config.as_deref())?;
        let mut overrides = Overrides {
            tokens: self.paths.tokens.clone(),
            clients: self.paths.clients.clone(),
            jobs_dir: self.paths.jobs_dir.clone(),
            public_key: self.paths.public_key.clone(),
            private_key: self.paths.private_key.clone(),
            ..Overrides::default()
        };
        if let Command::Serve(args) = &self.command {
            args.apply(&mut overrides);
        }
        Settings::resolve(file, overrides)
    }
}

/// Execute a command.
pub fn execute(command: Command, settings: &Settings) -> Result<()> {
    use Command::*;

    match command {
        Serve(_) => serve::execute(settings),
        Keygen { force } => keygen::execute(settings, force),
        Token { action } => match action {
            TokenAction::Add { token } => token::add(settings, &token),
            TokenAction::Rm { token } => token::rm(settings, &token),
            TokenAction::List { json } => token::list(settings, json),
        },
        Project { action } => match action {
            ProjectAction::Assign {
                token,
                project,
                description,
            } => project::assign(settings, &token, &project, &description),
            ProjectAction::Rm { token } => project::rm(settings, &token),
            ProjectAction::List { json } => project::list(settings, json),
            ProjectAction::Init { project, job } => project::init(settings, &project, &job),
        },
        Jobs { project, json } => jobs::execute(settings, &project, json),
        Completions { shell } => completions::execute(shell),
    }
}
