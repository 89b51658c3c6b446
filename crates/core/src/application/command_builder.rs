// Command Builder
//
// Pure: same classification, request and source path give the same argv.

use std::path::Path;

use super::classifier::Classification;
use crate::domain::{BuiltCommand, ExtractionRequest, FileKind};

/// Builds argument vectors for one tool executable
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
}

impl CommandBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `<program> <subcommand> -s <source> [-t <record type>] -o <format> [--format <family>]`
    pub fn build(
        &self,
        classification: &Classification,
        request: &ExtractionRequest,
        source_path: &Path,
    ) -> BuiltCommand {
        let mut argv = vec![
            self.program.clone(),
            classification.subcommand().to_string(),
            "-s".to_string(),
            source_path.to_string_lossy().into_owned(),
        ];

        if let Some(record_type) = classification.record_type {
            argv.push("-t".to_string());
            argv.push(record_type.as_str().to_string());
        }

        argv.push("-o".to_string());
        argv.push(request.format.as_arg().to_string());

        if request.family.descriptor().format_flag && classification.kind == FileKind::Database {
            argv.push("--format".to_string());
            argv.push(request.family.as_str().to_string());
        }

        BuiltCommand::new(argv)
    }
}
