// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod process_runner;
pub mod progress;

// Re-exports
pub use id_provider::{IdProvider, UuidProvider};
pub use process_runner::{ExecutionError, OutputSinks, ProcessOutcome, ProcessRunner};
pub use progress::{
    progress_channel, ChannelProgressReporter, Heartbeat, NoopProgressReporter, ProgressReporter,
};
