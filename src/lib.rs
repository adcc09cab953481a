//! Jobhook - run project jobs from authenticated webhooks.
//!
//! A caller presents a token. The token must be authorized, must be
//! assigned to exactly one project, and may only start jobs that exist as
//! `<jobs>/<project>/<job>.sh`. Accepted jobs run in the background; the
//! HTTP response never waits for them.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── serve         # Run the HTTP server
//! │   ├── keygen        # Server key pair
//! │   ├── token         # Authorized tokens admin
//! │   ├── project       # Token-to-project assignments, scaffolding
//! │   ├── jobs          # List a project's jobs
//! │   └── completions   # Shell completions
//! ├── core/             # Core library components
//! │   ├── config        # Layered settings (flags, env, jobhook.toml)
//! │   ├── credentials   # Authorized token set
//! │   ├── directory     # Token-to-project assignments
//! │   ├── catalog       # Job scripts on disk, path safety
//! │   ├── pipeline      # Authorization gates
//! │   ├── runner        # Job subprocess execution
//! │   ├── keys          # Server age key pair
//! │   └── persist       # Atomic file writes
//! └── server/           # HTTP boundary (axum)
//!     ├── handlers      # Endpoint handlers
//!     ├── params        # Request parameter extraction
//!     └── error         # Error responses
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod server;
