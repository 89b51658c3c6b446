// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown product family: {0}")]
    UnknownFamily(String),

    #[error("Unknown output format: {0}")]
    UnknownOutputFormat(String),

    #[error("Unknown record type: {0}")]
    UnknownRecordType(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Invalid pipe result: {0}")]
    InvalidPipeResult(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
