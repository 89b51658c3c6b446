// Central Error Type for a task invocation
//
// Only task-level conditions live here. Per-file problems (unsupported
// names, launch failures, timeouts) are logged and skipped by the pipeline.

use thiserror::Error;

use crate::application::constants::NO_SUPPORTED_FILES;

/// Task-level error type
#[derive(Error, Debug)]
pub enum TaskError {
    /// Every input was unsupported or failed
    #[error("{}", NO_SUPPORTED_FILES)]
    NoSupportedFiles,

    #[error("Missing task configuration")]
    MissingConfiguration,

    #[error("Invalid task configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Task cancelled")]
    Cancelled,
}

/// Result type alias using TaskError
pub type Result<T> = std::result::Result<T, TaskError>;
