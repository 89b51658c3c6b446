// Result Collector
//
// Names the paired stdout/stderr artifacts of each processed file and
// aggregates them into the task result.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use super::config::ExitStatusPolicy;
use crate::domain::{
    DataTypeQualifier, ExtractionRequest, OutputFile, TaskResult, STDERR_DATA_TYPE,
};
use crate::error::{Result, TaskError};
use crate::port::{IdProvider, ProcessOutcome};

/// Stdout and stderr artifacts of one input file
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPair {
    pub stdout: OutputFile,
    pub stderr: OutputFile,
}

impl ArtifactPair {
    /// Delete both files from disk (artifacts that will never be reported)
    pub fn discard(&self) {
        for path in [&self.stdout.path, &self.stderr.path] {
            remove_quietly(path);
        }
    }
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "Failed to remove output file");
        }
    }
}

/// Accumulates artifacts for one task invocation
pub struct ResultCollector {
    output_path: PathBuf,
    id_provider: Arc<dyn IdProvider>,
    namespace: String,
    policy: ExitStatusPolicy,
    output_files: Vec<OutputFile>,
    failed_files: Vec<String>,
}

impl ResultCollector {
    pub fn new(
        output_path: impl Into<PathBuf>,
        id_provider: Arc<dyn IdProvider>,
        namespace: impl Into<String>,
        policy: ExitStatusPolicy,
    ) -> Self {
        Self {
            output_path: output_path.into(),
            id_provider,
            namespace: namespace.into(),
            policy,
            output_files: Vec::new(),
            failed_files: Vec::new(),
        }
    }

    /// `<namespace>:<tool>:<family or record type>:<format>`
    pub fn data_type(&self, request: &ExtractionRequest, program: &str) -> String {
        let qualifier = match request.family.descriptor().data_type_qualifier {
            DataTypeQualifier::Family => request.family.as_str(),
            DataTypeQualifier::RecordType => request
                .record_type
                .map(|rt| rt.as_str())
                .unwrap_or_default(),
        };
        format!(
            "{}:{}:{}:{}",
            self.namespace,
            program,
            qualifier,
            request.format.as_arg()
        )
    }

    /// Describe the artifact pair for `request`; nothing is written yet
    pub fn prepare(&self, request: &ExtractionRequest, program: &str) -> ArtifactPair {
        let input = &request.input;
        let stdout_name = if request.family.descriptor().suffix_display_name {
            format!("{}.{}", input.display_name, request.family)
        } else {
            input.display_name.clone()
        };

        let stdout = OutputFile::new(
            &self.output_path,
            self.id_provider.generate_id(),
            &stdout_name,
            request.format.extension(),
            self.data_type(request, program),
        )
        .derived_from(input);

        let stderr = OutputFile::new(
            &self.output_path,
            self.id_provider.generate_id(),
            &input.display_name,
            &request.format.error_extension(),
            STDERR_DATA_TYPE,
        )
        .derived_from(input);

        ArtifactPair { stdout, stderr }
    }

    /// Record a pair whose process ran to completion
    pub fn record(&mut self, pair: ArtifactPair, outcome: &ProcessOutcome) {
        if !outcome.success() {
            warn!(
                display_name = %pair.stderr.display_name,
                exit_code = ?outcome.exit_code,
                "Extraction tool exited unsuccessfully"
            );
            if let Some(path) = pair.stdout.original_path.as_ref() {
                self.failed_files.push(path.to_string_lossy().into_owned());
            }
            if self.policy == ExitStatusPolicy::ErrorOnly {
                remove_quietly(&pair.stdout.path);
                self.output_files.push(pair.stderr);
                return;
            }
        }

        debug!(
            stdout = %pair.stdout.display_name,
            stderr = %pair.stderr.display_name,
            "Collected artifacts"
        );
        self.output_files.push(pair.stdout);
        self.output_files.push(pair.stderr);
    }

    pub fn len(&self) -> usize {
        self.output_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output_files.is_empty()
    }

    /// Build the task result; fails when nothing was collected
    pub fn finalize(self, workflow_id: Option<String>, command: &str) -> Result<TaskResult> {
        if self.output_files.is_empty() {
            return Err(TaskError::NoSupportedFiles);
        }

        let mut meta = serde_json::Map::new();
        if !self.failed_files.is_empty() {
            meta.insert("failed_files".to_string(), serde_json::json!(self.failed_files));
        }

        Ok(TaskResult {
            output_files: self.output_files,
            workflow_id,
            command: command.to_string(),
            meta,
        })
    }
}
