// Progress Port
// Liveness signalling towards the host while a tool is running

use tokio::sync::mpsc;

/// Payload-free liveness event
///
/// The wrapped tools report no progress, so there is no percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heartbeat;

/// Receives one heartbeat per poll interval while a child process is alive
pub trait ProgressReporter: Send + Sync {
    fn heartbeat(&self);
}

/// Reporter for callers that do not need liveness signals
pub struct NoopProgressReporter;

impl ProgressReporter for NoopProgressReporter {
    fn heartbeat(&self) {}
}

/// Forwards heartbeats into a channel owned by the host
pub struct ChannelProgressReporter {
    tx: mpsc::UnboundedSender<Heartbeat>,
}

impl ProgressReporter for ChannelProgressReporter {
    fn heartbeat(&self) {
        // Receiver gone means the host stopped listening; nothing to signal
        let _ = self.tx.send(Heartbeat);
    }
}

/// Create a heartbeat channel
pub fn progress_channel() -> (ChannelProgressReporter, mpsc::UnboundedReceiver<Heartbeat>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelProgressReporter { tx }, rx)
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Counts heartbeats
    #[derive(Default)]
    pub struct CountingProgressReporter {
        count: AtomicU64,
    }

    impl CountingProgressReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self) -> u64 {
            self.count.load(Ordering::SeqCst)
        }
    }

    impl ProgressReporter for CountingProgressReporter {
        fn heartbeat(&self) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_reporter_forwards_heartbeats() {
        let (reporter, mut rx) = progress_channel();
        reporter.heartbeat();
        reporter.heartbeat();

        assert_eq!(rx.recv().await, Some(Heartbeat));
        assert_eq!(rx.recv().await, Some(Heartbeat));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (reporter, rx) = progress_channel();
        drop(rx);
        reporter.heartbeat();
    }
}
