//! Error types for git-courier
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.
//!
//! The taxonomy keeps three failure classes apart:
//! - [`SpawnError`] - the process could not start; always detected synchronously,
//!   before any asynchronous work begins
//! - [`ProcessError`] - the external tool ran and reported failure; only
//!   observable after process exit
//! - [`Error::Aborted`] - the user declined a required input; raised before
//!   anything is spawned

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for git-courier
#[derive(Error, Debug)]
pub enum Error {
    #[error("Spawn error: {0}")]
    Spawn(#[from] SpawnError),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Aborted: {0}")]
    Aborted(String),
}

/// Process startup errors, reported synchronously by [`Runner::spawn`]
///
/// [`Runner::spawn`]: crate::runner::Runner::spawn
#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("Working directory does not exist: {0}")]
    MissingWorkingDir(PathBuf),

    #[error("Working directory is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("'{program}' is not installed or not in PATH")]
    BinaryNotFound { program: String },

    #[error("Empty invocation: nothing to run")]
    EmptyInvocation,

    #[error("Failed to spawn '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors observed after an external process has terminated
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("git {context} exited with code {code}")]
    Failed { context: String, code: i32 },

    #[error("git {context} was terminated by a signal")]
    Signaled { context: String },

    #[error("Process exit was never reported (wait task dropped)")]
    Disconnected,
}

/// Repository-level errors from precondition checks
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("Remote '{0}' does not exist")]
    RemoteNotFound(String),

    #[error("Remote '{0}' already exists")]
    RemoteExists(String),

    #[error("Invalid remote name: '{0}'")]
    InvalidRemoteName(String),

    #[error("Config key '{key}' could not be {action}: {stderr}")]
    ConfigKey {
        key: String,
        action: String,
        stderr: String,
    },

    #[error("Invalid reference: {0}")]
    InvalidRef(String),

    #[error("Gitoxide error: {0}")]
    Gix(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpawnError::MissingWorkingDir(PathBuf::from("/no/such/dir"));
        assert!(err.to_string().contains("/no/such/dir"));

        let err = ProcessError::Failed {
            context: "fetch".to_string(),
            code: 128,
        };
        assert!(err.to_string().contains("128"));

        let err = GitError::RemoteNotFound("upstream".to_string());
        assert!(err.to_string().contains("upstream"));
    }

    #[test]
    fn test_error_conversion() {
        let spawn_err = SpawnError::EmptyInvocation;
        let _top_err: Error = spawn_err.into();

        let process_err = ProcessError::Disconnected;
        let _top_err: Error = process_err.into();
    }
}
