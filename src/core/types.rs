//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A caller token as presented on the wire.
///
/// Opaque bearer secret; historically the text of a client public key.
pub type Token = String;

/// A project name (matches `^[A-Za-z0-9_-]+$`).
///
/// Also the name of the project's directory under the jobs root.
pub type ProjectName = String;

/// A job name (matches `^[A-Za-z0-9_-]+$`).
///
/// Resolves to `<jobs>/<project>/<job>.sh`.
pub type JobName = String;
