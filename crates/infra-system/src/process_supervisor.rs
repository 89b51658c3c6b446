// Process supervisor
// Runs an extraction tool with its streams redirected to artifact files,
// emitting a heartbeat per interval until the child exits.
use async_trait::async_trait;
use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::process::{Child, Command};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use dfextract_core::application::constants::GRACEFUL_SHUTDOWN_TIMEOUT;
use dfextract_core::application::{PipelineConfig, ShutdownToken};
use dfextract_core::domain::BuiltCommand;
use dfextract_core::port::{
    ExecutionError, OutputSinks, ProcessOutcome, ProcessRunner, ProgressReporter,
};

/// What woke the supervision loop
enum Event {
    Exited(io::Result<ExitStatus>),
    Tick,
    Cancelled,
    TimedOut,
}

/// Supervises one child process at a time
pub struct ProcessSupervisor {
    progress_interval: Duration,
    timeout: Option<Duration>,
    grace_period: Duration,
}

impl ProcessSupervisor {
    /// Create a supervisor
    ///
    /// # Arguments
    /// * `progress_interval` - Time between heartbeats while the child runs
    /// * `timeout` - Per-process limit, None waits indefinitely
    pub fn new(progress_interval: Duration, timeout: Option<Duration>) -> Self {
        Self {
            progress_interval,
            timeout,
            grace_period: GRACEFUL_SHUTDOWN_TIMEOUT,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.progress_interval, config.timeout)
    }

    /// Time a child gets to exit after SIGTERM before it is killed
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    fn spawn(&self, command: &BuiltCommand, sinks: OutputSinks) -> Result<Child, ExecutionError> {
        let program = command.program().ok_or(ExecutionError::EmptyCommand)?;

        Command::new(program)
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::from(sinks.stdout))
            .stderr(Stdio::from(sinks.stderr))
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed {
                program: program.to_string(),
                reason: e.to_string(),
            })
    }

    /// SIGTERM first, SIGKILL once the grace period has passed
    async fn terminate(&self, child: &mut Child) {
        #[cfg(unix)]
        if let Some(pid) = child.id() {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            info!(pid = %pid, "Sending SIGTERM for graceful shutdown");
            match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                Ok(()) => match tokio::time::timeout(self.grace_period, child.wait()).await {
                    Ok(_) => {
                        info!(pid = %pid, "Process exited gracefully after SIGTERM");
                        return;
                    }
                    Err(_) => {
                        warn!(pid = %pid, "Process did not exit after SIGTERM, sending SIGKILL");
                    }
                },
                Err(e) => warn!(pid = %pid, error = %e, "SIGTERM failed"),
            }
        }

        if let Err(e) = child.kill().await {
            warn!(error = %e, "Failed to kill process");
        }
    }
}

#[async_trait]
impl ProcessRunner for ProcessSupervisor {
    async fn run(
        &self,
        command: &BuiltCommand,
        sinks: OutputSinks,
        progress: &dyn ProgressReporter,
        mut shutdown: ShutdownToken,
    ) -> Result<ProcessOutcome, ExecutionError> {
        let stdout_path = sinks.stdout_path.clone();
        let stderr_path = sinks.stderr_path.clone();

        info!(command = %command, timeout = ?self.timeout, "Starting subprocess execution");
        let mut child = self.spawn(command, sinks)?;

        let started = Instant::now();
        let mut ticker = interval_at(started + self.progress_interval, self.progress_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let timeout = self.timeout;
        let deadline = async move {
            match timeout {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(deadline);

        let mut heartbeats = 0u64;
        let status = loop {
            let event = tokio::select! {
                biased;
                status = child.wait() => Event::Exited(status),
                _ = shutdown.wait() => Event::Cancelled,
                _ = &mut deadline => Event::TimedOut,
                _ = ticker.tick() => Event::Tick,
            };

            match event {
                Event::Exited(status) => {
                    break status.map_err(|e| ExecutionError::IoError(e.to_string()))?
                }
                Event::Tick => {
                    heartbeats += 1;
                    debug!(heartbeats, "Process still running");
                    progress.heartbeat();
                }
                Event::Cancelled => {
                    warn!(command = %command, "Cancellation requested, stopping process");
                    self.terminate(&mut child).await;
                    return Err(ExecutionError::Cancelled);
                }
                Event::TimedOut => {
                    let limit_ms = timeout.map(|t| t.as_millis() as u64).unwrap_or_default();
                    warn!(command = %command, limit_ms, "Process timed out, stopping it");
                    self.terminate(&mut child).await;
                    return Err(ExecutionError::Timeout(limit_ms));
                }
            }
        };

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            duration_ms = %duration_ms,
            exit_code = ?status.code(),
            heartbeats,
            "Subprocess execution completed"
        );

        Ok(ProcessOutcome {
            exit_code: status.code(),
            stdout_path,
            stderr_path,
            duration_ms,
            heartbeats,
        })
    }
}
