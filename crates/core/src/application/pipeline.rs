// Extraction Pipeline
//
// classify -> (stage) -> build -> run -> collect, sequentially per input file.
// Per-file problems are logged and the file is skipped; TaskError lists what
// fails the whole task.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use super::classifier::{classify, ClassifyOutcome};
use super::collector::ResultCollector;
use super::command_builder::CommandBuilder;
use super::config::PipelineConfig;
use super::shutdown::ShutdownToken;
use super::staging::StagingArea;
use crate::domain::{
    resolve_input_files, ExtractionRequest, ExtractionSettings, InputFile, TaskInvocation,
    TaskKind, TaskResult,
};
use crate::error::{Result, TaskError};
use crate::port::{ExecutionError, IdProvider, OutputSinks, ProcessRunner, ProgressReporter};

/// Runs one task invocation end to end
pub struct ExtractionPipeline {
    runner: Arc<dyn ProcessRunner>,
    progress: Arc<dyn ProgressReporter>,
    id_provider: Arc<dyn IdProvider>,
    config: PipelineConfig,
}

impl ExtractionPipeline {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        progress: Arc<dyn ProgressReporter>,
        id_provider: Arc<dyn IdProvider>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            runner,
            progress,
            id_provider,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute `kind` for `invocation`
    ///
    /// # Errors
    /// - TaskError::MissingConfiguration if no task config was supplied
    /// - TaskError::InvalidConfiguration for unknown family/format/record type
    /// - TaskError::NoSupportedFiles if no file produced artifacts
    /// - TaskError::Cancelled if `shutdown` fired
    pub async fn run(
        &self,
        kind: TaskKind,
        invocation: TaskInvocation,
        shutdown: ShutdownToken,
    ) -> Result<TaskResult> {
        let TaskInvocation {
            pipe_result,
            input_files,
            output_path,
            workflow_id,
            task_config,
        } = invocation;

        let input_files = resolve_input_files(pipe_result.as_deref(), input_files)?;
        let task_config = task_config.ok_or(TaskError::MissingConfiguration)?;
        let settings = ExtractionSettings::from_config(kind, &task_config)
            .map_err(|e| TaskError::InvalidConfiguration(e.to_string()))?;

        let descriptor = settings.family.descriptor();
        let program = self.config.program(descriptor.tool).to_string();

        info!(
            task = %kind.task_name(),
            family = %settings.family,
            format = %settings.format,
            record_type = ?settings.record_type,
            files = input_files.len(),
            workflow_id = ?workflow_id,
            "Starting extraction task"
        );

        let staging = if descriptor.needs_staging {
            Some(StagingArea::create(&output_path, &self.id_provider.generate_id())?)
        } else {
            None
        };

        let mut collector = ResultCollector::new(
            &output_path,
            Arc::clone(&self.id_provider),
            self.config.data_type_namespace.clone(),
            self.config.exit_status_policy,
        );
        let builder = CommandBuilder::new(&program);

        for input in input_files {
            if shutdown.is_shutdown() {
                return Err(TaskError::Cancelled);
            }
            let request = ExtractionRequest::new(input, &settings);
            match self
                .process_file(
                    &request,
                    staging.as_ref(),
                    &builder,
                    descriptor.tool.default_program(),
                    &mut collector,
                    &shutdown,
                )
                .await
            {
                Ok(()) => {}
                Err(ExecutionError::Cancelled) => {
                    warn!(display_name = %request.input.display_name, "Extraction cancelled");
                    return Err(TaskError::Cancelled);
                }
                Err(e) => {
                    warn!(
                        display_name = %request.input.display_name,
                        error = %e,
                        "Extraction failed for file, skipping"
                    );
                }
            }
        }

        if let Some(area) = staging {
            if let Err(e) = area.close() {
                warn!(error = %e, "Failed to remove staging directory");
            }
        }

        let result = collector.finalize(workflow_id, &program)?;
        info!(
            artifacts = result.output_files.len(),
            "Extraction task completed"
        );
        Ok(result)
    }

    /// Handle one file; Ok(()) also covers files skipped as unsupported
    async fn process_file(
        &self,
        request: &ExtractionRequest,
        staging: Option<&StagingArea>,
        builder: &CommandBuilder,
        tool_name: &str,
        collector: &mut ResultCollector,
        shutdown: &ShutdownToken,
    ) -> std::result::Result<(), ExecutionError> {
        let input = &request.input;
        let classified = classify(&input.display_name, request.family, request.record_type);
        let classification = match classified {
            ClassifyOutcome::Supported(c) => c,
            ClassifyOutcome::Unsupported(reason) => {
                info!(
                    display_name = %input.display_name,
                    family = %request.family,
                    reason = %reason,
                    "Skipping unsupported file"
                );
                return Ok(());
            }
        };

        let source_path = source_path_for(input, staging)?;
        let command = builder.build(&classification, request, &source_path);
        let pair = collector.prepare(request, tool_name);

        let sinks = OutputSinks::create(&pair.stdout.path, &pair.stderr.path).map_err(|e| {
            pair.discard();
            ExecutionError::IoError(e.to_string())
        })?;

        info!(command = %command, "Running extraction");
        match self
            .runner
            .run(&command, sinks, self.progress.as_ref(), shutdown.clone())
            .await
        {
            Ok(outcome) => {
                info!(
                    display_name = %input.display_name,
                    exit_code = ?outcome.exit_code,
                    duration_ms = outcome.duration_ms,
                    heartbeats = outcome.heartbeats,
                    "Extraction finished"
                );
                collector.record(pair, &outcome);
                Ok(())
            }
            Err(e) => {
                pair.discard();
                Err(e)
            }
        }
    }
}

fn source_path_for(
    input: &InputFile,
    staging: Option<&StagingArea>,
) -> std::result::Result<PathBuf, ExecutionError> {
    match staging {
        Some(area) => area
            .stage(input)
            .map_err(|e| ExecutionError::IoError(format!("staging {}: {}", input.display_name, e))),
        None => Ok(input.path.clone()),
    }
}
