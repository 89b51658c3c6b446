// Domain Layer - Pure data model, no I/O

pub mod artifact;
pub mod command;
pub mod error;
pub mod family;
pub mod input_file;
pub mod output_format;
pub mod request;

// Re-exports
pub use artifact::{resolve_input_files, OutputFile, TaskResult};
pub use command::BuiltCommand;
pub use error::DomainError;
pub use family::{DataTypeQualifier, FamilyDescriptor, FileKind, ProductFamily, RecordType, Tool};
pub use input_file::InputFile;
pub use output_format::{OutputFormat, STDERR_DATA_TYPE};
pub use request::{ExtractionRequest, ExtractionSettings, TaskConfig, TaskInvocation, TaskKind};
