//! services/taskflow/src/error.rs
//!
//! Error types for the stores, and the primary error type for the binary.

use crate::config::ConfigError;
use taskflow_core::ports::PortError;
use taskflow_core::tasks::ValidationReport;
use taskflow_core::ParseError;

/// Failures of registration and login. Validation and credential errors are meant
/// to be shown to the user as-is.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Invalid task: {0}")]
    Validation(ValidationReport),

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

/// Failures of the calendar and finance stores.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
}

/// The primary error type for the `taskflow` binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("Storage error: {0}")]
    Port(#[from] PortError),

    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Task(#[from] TaskError),

    #[error("{0}")]
    Record(#[from] RecordError),

    /// A command-line value outside the accepted set.
    #[error("Invalid argument: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    /// The command needs a signed-in user and there is none.
    #[error("Not logged in; run `taskflow login` first")]
    NotLoggedIn,
}
