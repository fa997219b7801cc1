//! Error types for ssl-setup.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tool.
#[derive(Error, Debug)]
pub enum SetupError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors.
    #[error("Validation error: {kind}")]
    Validation { kind: ValidationErrorKind },

    /// Subprocess execution errors.
    #[error("Command error: {kind}")]
    Command { kind: CommandErrorKind },

    /// Certificate installation errors.
    #[error("Install error: {kind}")]
    Install { kind: InstallErrorKind },

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validation error kinds.
#[derive(Error, Debug)]
pub enum ValidationErrorKind {
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },
}

/// Subprocess error kinds.
#[derive(Error, Debug)]
pub enum CommandErrorKind {
    #[error("Command execution failed: {message}")]
    ExecutionFailed { message: String },

    #[error("Command timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

/// Certificate installation error kinds.
#[derive(Error, Debug)]
pub enum InstallErrorKind {
    #[error("Failed to remove stale file at {path}: {message}")]
    RemoveFailed { path: PathBuf, message: String },

    #[error("Failed to copy {source_path} to {target}: {message}")]
    CopyFailed {
        source_path: PathBuf,
        target: PathBuf,
        message: String,
    },
}

/// Result type alias for ssl-setup operations.
pub type SetupResult<T> = Result<T, SetupError>;
