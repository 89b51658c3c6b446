// Pipeline constants (no magic values)
use std::time::Duration;

/// Interval between liveness heartbeats while a tool runs (2s)
pub const PROGRESS_INTERVAL: Duration = Duration::from_secs(2);

/// Grace period between SIGTERM and SIGKILL when stopping a tool (5s)
pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Namespace prefix of stdout artifact data types
pub const DATA_TYPE_NAMESPACE: &str = "openrelik";

/// Task name prefix used when registering with the host
pub const TASK_NAME_PREFIX: &str = "dfextract-worker.tasks";

/// Message of the task-level failure raised when nothing was extracted
pub const NO_SUPPORTED_FILES: &str = "No supported files";
