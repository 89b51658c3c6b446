// Application Layer - Use Cases and Business Logic

pub mod classifier;
pub mod collector;
pub mod command_builder;
pub mod config;
pub mod constants;
pub mod pipeline;
pub mod registry;
pub mod shutdown;
pub mod staging;

// Re-exports
pub use classifier::{classify, Classification, ClassifyOutcome, UnsupportedReason};
pub use collector::{ArtifactPair, ResultCollector};
pub use command_builder::CommandBuilder;
pub use config::{ExitStatusPolicy, PipelineConfig};
pub use pipeline::ExtractionPipeline;
pub use registry::{all_definitions, ConfigField, TaskDefinition};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};
pub use staging::StagingArea;
