// Output Artifacts and Task Result

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::DomainError;
use super::input_file::InputFile;

/// Output file produced by a task, with provenance back to its input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFile {
    pub uuid: String,
    pub filename: String,
    pub display_name: String,
    /// Without the leading dot
    pub extension: String,
    pub data_type: String,
    pub path: PathBuf,
    #[serde(default)]
    pub original_path: Option<PathBuf>,
    #[serde(default)]
    pub source_file_id: Option<serde_json::Value>,
}

impl OutputFile {
    /// Describe a new output file under `output_path`
    ///
    /// Nothing is written to disk; the file name is `<uuid>.<extension>` so
    /// concurrent tasks sharing an output directory never collide.
    pub fn new(
        output_path: &Path,
        uuid: impl Into<String>,
        display_name: &str,
        extension: &str,
        data_type: impl Into<String>,
    ) -> Self {
        let uuid = uuid.into();
        let extension = extension.trim_start_matches('.').to_string();
        let (filename, display_name) = if extension.is_empty() {
            (uuid.clone(), display_name.to_string())
        } else {
            (
                format!("{}.{}", uuid, extension),
                format!("{}.{}", display_name, extension),
            )
        };

        Self {
            path: output_path.join(&filename),
            uuid,
            filename,
            display_name,
            extension,
            data_type: data_type.into(),
            original_path: None,
            source_file_id: None,
        }
    }

    /// Link the output back to the input it was derived from
    pub fn derived_from(mut self, input: &InputFile) -> Self {
        self.original_path = Some(input.path.clone());
        self.source_file_id = input.id.clone();
        self
    }

    /// View this output as the input of a follow-up task
    pub fn to_input_file(&self) -> InputFile {
        InputFile {
            id: None,
            uuid: Some(self.uuid.clone()),
            display_name: self.display_name.clone(),
            extension: Some(self.extension.clone()),
            data_type: Some(self.data_type.clone()),
            path: self.path.clone(),
            original_path: self.original_path.clone(),
        }
    }
}

/// Aggregated result of one task invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub output_files: Vec<OutputFile>,
    pub workflow_id: Option<String>,
    pub command: String,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}

impl TaskResult {
    /// Base64(JSON) form handed back to the host and piped to the next task
    pub fn encode(&self) -> Result<String, DomainError> {
        let json = serde_json::to_vec(self)
            .map_err(|e| DomainError::ValidationError(format!("task result not serializable: {}", e)))?;
        Ok(STANDARD.encode(json))
    }

    pub fn decode(encoded: &str) -> Result<Self, DomainError> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| DomainError::InvalidPipeResult(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| DomainError::InvalidPipeResult(e.to_string()))
    }
}

/// Input files for a task: a piped result takes precedence over the explicit list
pub fn resolve_input_files(
    pipe_result: Option<&str>,
    input_files: Vec<InputFile>,
) -> Result<Vec<InputFile>, DomainError> {
    match pipe_result {
        Some(encoded) if !encoded.trim().is_empty() => {
            let previous = TaskResult::decode(encoded)?;
            Ok(previous
                .output_files
                .iter()
                .map(OutputFile::to_input_file)
                .collect())
        }
        _ => Ok(input_files),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_result() -> TaskResult {
        let input = InputFile::new("000003.log", "/evidence/000003.log").with_id(7);
        TaskResult {
            output_files: vec![OutputFile::new(
                Path::new("/out"),
                "abc123",
                "000003.log",
                ".json",
                "openrelik:dfleveldb:blocks:json",
            )
            .derived_from(&input)],
            workflow_id: Some("wf-1".to_string()),
            command: "dfleveldb".to_string(),
            meta: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_output_file_naming() {
        let file = OutputFile::new(Path::new("/out"), "abc", "x.sqlite", "json.error.txt", "plain/txt");
        assert_eq!(file.filename, "abc.json.error.txt");
        assert_eq!(file.display_name, "x.sqlite.json.error.txt");
        assert_eq!(file.path, PathBuf::from("/out/abc.json.error.txt"));
    }

    #[test]
    fn test_derived_from_keeps_provenance() {
        let result = sample_result();
        let file = &result.output_files[0];
        assert_eq!(file.original_path, Some(PathBuf::from("/evidence/000003.log")));
        assert_eq!(file.source_file_id, Some(serde_json::json!(7)));
    }

    #[test]
    fn test_pipe_result_becomes_input_files() {
        let encoded = sample_result().encode().unwrap();
        let explicit = vec![InputFile::new("ignored", "/ignored")];

        let inputs = resolve_input_files(Some(&encoded), explicit).unwrap();

        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].display_name, "000003.log.json");
        assert_eq!(inputs[0].path, PathBuf::from("/out/abc123.json"));
        assert_eq!(inputs[0].uuid.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_without_pipe_result_uses_explicit_files() {
        let explicit = vec![InputFile::new("a.sqlite", "/a.sqlite")];
        let inputs = resolve_input_files(None, explicit.clone()).unwrap();
        assert_eq!(inputs, explicit);

        let inputs = resolve_input_files(Some("  "), explicit.clone()).unwrap();
        assert_eq!(inputs, explicit);
    }

    #[test]
    fn test_garbage_pipe_result_is_rejected() {
        let result = resolve_input_files(Some("not base64 !!"), vec![]);
        assert!(matches!(result, Err(DomainError::InvalidPipeResult(_))));
    }
}
