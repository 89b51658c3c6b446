// Pipeline configuration

use std::str::FromStr;
use std::time::Duration;

use super::constants::{DATA_TYPE_NAMESPACE, PROGRESS_INTERVAL};
use crate::domain::{DomainError, Tool};

/// What a non-zero tool exit does to a file's artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitStatusPolicy {
    /// Report both artifacts regardless of exit code
    #[default]
    Ignore,
    /// Drop the stdout artifact and report only the error artifact
    ErrorOnly,
}

impl FromStr for ExitStatusPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(ExitStatusPolicy::Ignore),
            "error-only" | "error_only" => Ok(ExitStatusPolicy::ErrorOnly),
            other => Err(DomainError::ValidationError(format!(
                "unknown exit status policy '{}' (expected ignore or error-only)",
                other
            ))),
        }
    }
}

/// Settings of the extraction pipeline that are not part of a task invocation
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub progress_interval: Duration,
    /// Per-process limit; None waits indefinitely
    pub timeout: Option<Duration>,
    pub exit_status_policy: ExitStatusPolicy,
    pub indexeddb_program: String,
    pub leveldb_program: String,
    pub data_type_namespace: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            progress_interval: PROGRESS_INTERVAL,
            timeout: None,
            exit_status_policy: ExitStatusPolicy::default(),
            indexeddb_program: Tool::IndexedDb.default_program().to_string(),
            leveldb_program: Tool::LevelDb.default_program().to_string(),
            data_type_namespace: DATA_TYPE_NAMESPACE.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Executable to invoke for `tool`
    pub fn program(&self, tool: Tool) -> &str {
        match tool {
            Tool::IndexedDb => &self.indexeddb_program,
            Tool::LevelDb => &self.leveldb_program,
        }
    }
}
