// dfextract Infrastructure - System Adapters
// Implements: ProcessRunner, ProgressReporter

pub mod process_supervisor;
pub mod progress_reporter;

pub use process_supervisor::ProcessSupervisor;
pub use progress_reporter::TracingProgressReporter;
