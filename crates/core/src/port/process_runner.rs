// Process Runner Port
// Abstraction for running the external extraction tool under supervision

use async_trait::async_trait;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::shutdown::ShutdownToken;
use crate::domain::BuiltCommand;
use crate::port::ProgressReporter;

/// Files receiving the child's output streams
///
/// Both files are created (truncated) up front, so an artifact exists even
/// when the tool writes nothing to it.
#[derive(Debug)]
pub struct OutputSinks {
    pub stdout: File,
    pub stderr: File,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
}

impl OutputSinks {
    pub fn create(stdout_path: &Path, stderr_path: &Path) -> io::Result<Self> {
        Ok(Self {
            stdout: File::create(stdout_path)?,
            stderr: File::create(stderr_path)?,
            stdout_path: stdout_path.to_path_buf(),
            stderr_path: stderr_path.to_path_buf(),
        })
    }
}

/// Result of a child process that ran to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout_path: PathBuf,
    pub stderr_path: PathBuf,
    pub duration_ms: u64,
    pub heartbeats: u64,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Execution errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Spawn failed for '{program}': {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Process timeout after {0}ms")]
    Timeout(u64),

    #[error("Process cancelled")]
    Cancelled,

    #[error("Empty command")]
    EmptyCommand,

    #[error("IO error: {0}")]
    IoError(String),
}

/// Process runner trait
///
/// Implementations:
/// - ProcessSupervisor (infra-system): spawns the tool with heartbeats
/// - MockProcessRunner: scripted outcomes for pipeline tests
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `command` to completion with its streams redirected into `sinks`
    ///
    /// A non-zero exit is not an error; interpreting it is the caller's job.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the program cannot be started
    /// - ExecutionError::Timeout if the run exceeds the configured limit
    /// - ExecutionError::Cancelled if `shutdown` fires while running
    async fn run(
        &self,
        command: &BuiltCommand,
        sinks: OutputSinks,
        progress: &dyn ProgressReporter,
        shutdown: ShutdownToken,
    ) -> Result<ProcessOutcome, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with `code` after writing the given stream contents
        Exit {
            code: i32,
            stdout: String,
            stderr: String,
        },
        /// Fail to launch
        SpawnFail(String),
        /// Time out after N ms
        Timeout(u64),
        /// Report cancellation
        Cancelled,
    }

    impl MockBehavior {
        pub fn exit(code: i32) -> Self {
            MockBehavior::Exit {
                code,
                stdout: "mock output".to_string(),
                stderr: String::new(),
            }
        }
    }

    /// One recorded `run` call
    #[derive(Debug, Clone)]
    pub struct RecordedRun {
        pub command: BuiltCommand,
        /// Whether the `-s` source path existed when the run started
        pub source_existed: bool,
        pub stdout_path: PathBuf,
        pub stderr_path: PathBuf,
    }

    /// Mock Process Runner for testing
    pub struct MockProcessRunner {
        default: MockBehavior,
        script: Mutex<VecDeque<MockBehavior>>,
        runs: Arc<Mutex<Vec<RecordedRun>>>,
        heartbeats_per_run: u64,
    }

    impl MockProcessRunner {
        pub fn new(default: MockBehavior) -> Self {
            Self {
                default,
                script: Mutex::new(VecDeque::new()),
                runs: Arc::new(Mutex::new(Vec::new())),
                heartbeats_per_run: 0,
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::exit(0))
        }

        /// Queue a behavior for the next unscripted call
        pub fn then(self, behavior: MockBehavior) -> Self {
            self.script.lock().unwrap().push_back(behavior);
            self
        }

        /// Emit this many heartbeats on every successful run
        pub fn with_heartbeats(mut self, count: u64) -> Self {
            self.heartbeats_per_run = count;
            self
        }

        pub fn runs(&self) -> Vec<RecordedRun> {
            self.runs.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.runs.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ProcessRunner for MockProcessRunner {
        async fn run(
            &self,
            command: &BuiltCommand,
            mut sinks: OutputSinks,
            progress: &dyn ProgressReporter,
            _shutdown: ShutdownToken,
        ) -> Result<ProcessOutcome, ExecutionError> {
            let source_existed = command
                .flag_value("-s")
                .map(|p| Path::new(p).exists())
                .unwrap_or(false);
            self.runs.lock().unwrap().push(RecordedRun {
                command: command.clone(),
                source_existed,
                stdout_path: sinks.stdout_path.clone(),
                stderr_path: sinks.stderr_path.clone(),
            });

            let behavior = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.default.clone());

            match behavior {
                MockBehavior::Exit { code, stdout, stderr } => {
                    sinks
                        .stdout
                        .write_all(stdout.as_bytes())
                        .map_err(|e| ExecutionError::IoError(e.to_string()))?;
                    sinks
                        .stderr
                        .write_all(stderr.as_bytes())
                        .map_err(|e| ExecutionError::IoError(e.to_string()))?;
                    for _ in 0..self.heartbeats_per_run {
                        progress.heartbeat();
                    }
                    Ok(ProcessOutcome {
                        exit_code: Some(code),
                        stdout_path: sinks.stdout_path,
                        stderr_path: sinks.stderr_path,
                        duration_ms: 10,
                        heartbeats: self.heartbeats_per_run,
                    })
                }
                MockBehavior::SpawnFail(reason) => Err(ExecutionError::SpawnFailed {
                    program: command.program().unwrap_or_default().to_string(),
                    reason,
                }),
                MockBehavior::Timeout(ms) => Err(ExecutionError::Timeout(ms)),
                MockBehavior::Cancelled => Err(ExecutionError::Cancelled),
            }
        }
    }
}
