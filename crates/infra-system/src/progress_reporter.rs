// Tracing progress reporter
// Surfaces heartbeats as log events so a supervising host sees a live task
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

use dfextract_core::port::ProgressReporter;

/// Logs one event per heartbeat, tagged with the task name
pub struct TracingProgressReporter {
    task: String,
    started: Instant,
    beats: AtomicU64,
}

impl TracingProgressReporter {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            started: Instant::now(),
            beats: AtomicU64::new(0),
        }
    }

    pub fn beats(&self) -> u64 {
        self.beats.load(Ordering::Relaxed)
    }
}

impl ProgressReporter for TracingProgressReporter {
    fn heartbeat(&self) {
        let beats = self.beats.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            task = %self.task,
            heartbeat = beats,
            elapsed_secs = self.started.elapsed().as_secs(),
            "Task in progress"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_heartbeats() {
        let reporter = TracingProgressReporter::new("dfextract-worker.tasks.leveldb");
        reporter.heartbeat();
        reporter.heartbeat();
        assert_eq!(reporter.beats(), 2);
    }
}
