// Task Invocation and Extraction Request

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use super::error::DomainError;
use super::family::{ProductFamily, RecordType};
use super::input_file::InputFile;
use super::output_format::OutputFormat;

/// Host-visible task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    IndexedDb,
    LevelDb,
}

impl TaskKind {
    pub const ALL: [TaskKind; 2] = [TaskKind::IndexedDb, TaskKind::LevelDb];

    pub fn short_name(&self) -> &'static str {
        match self {
            TaskKind::IndexedDb => "indexeddb",
            TaskKind::LevelDb => "leveldb",
        }
    }
}

impl FromStr for TaskKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indexeddb" => Ok(TaskKind::IndexedDb),
            "leveldb" => Ok(TaskKind::LevelDb),
            _ => Err(DomainError::UnknownTask(s.to_string())),
        }
    }
}

/// Raw user configuration as submitted through the host's task form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub browser_type: Option<String>,
    #[serde(default)]
    pub record_type: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
}

/// Everything the host passes to one task execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskInvocation {
    /// Base64 task result of the previous task in a workflow
    #[serde(default)]
    pub pipe_result: Option<String>,
    #[serde(default)]
    pub input_files: Vec<InputFile>,
    pub output_path: PathBuf,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub task_config: Option<TaskConfig>,
}

/// Validated configuration shared by every file of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionSettings {
    pub family: ProductFamily,
    pub format: OutputFormat,
    pub record_type: Option<RecordType>,
}

impl ExtractionSettings {
    pub fn from_config(kind: TaskKind, config: &TaskConfig) -> Result<Self, DomainError> {
        let format = required(&config.output_format, "output_format")?.parse::<OutputFormat>()?;

        match kind {
            TaskKind::IndexedDb => {
                let family = required(&config.browser_type, "browser_type")?.parse::<ProductFamily>()?;
                if !ProductFamily::BROWSERS.contains(&family) {
                    return Err(DomainError::ValidationError(format!(
                        "{} is not a browser type",
                        family
                    )));
                }
                Ok(Self {
                    family,
                    format,
                    record_type: None,
                })
            }
            TaskKind::LevelDb => {
                let record_type = required(&config.record_type, "record_type")?.parse::<RecordType>()?;
                Ok(Self {
                    family: ProductFamily::LevelDb,
                    format,
                    record_type: Some(record_type),
                })
            }
        }
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, DomainError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::ValidationError(format!("missing '{}' in task config", field)))
}

/// One input file paired with the invocation's settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub input: InputFile,
    pub family: ProductFamily,
    pub format: OutputFormat,
    pub record_type: Option<RecordType>,
}

impl ExtractionRequest {
    pub fn new(input: InputFile, settings: &ExtractionSettings) -> Self {
        Self {
            input,
            family: settings.family,
            format: settings.format,
            record_type: settings.record_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(browser: Option<&str>, record: Option<&str>, format: Option<&str>) -> TaskConfig {
        TaskConfig {
            browser_type: browser.map(String::from),
            record_type: record.map(String::from),
            output_format: format.map(String::from),
        }
    }

    #[test]
    fn test_indexeddb_settings() {
        let settings =
            ExtractionSettings::from_config(TaskKind::IndexedDb, &config(Some("firefox"), None, Some("JSONL")))
                .unwrap();
        assert_eq!(settings.family, ProductFamily::Firefox);
        assert_eq!(settings.format, OutputFormat::Jsonl);
        assert_eq!(settings.record_type, None);
    }

    #[test]
    fn test_leveldb_settings_ignore_browser_type() {
        let settings = ExtractionSettings::from_config(
            TaskKind::LevelDb,
            &config(Some("safari"), Some("blocks"), Some("JSON")),
        )
        .unwrap();
        assert_eq!(settings.family, ProductFamily::LevelDb);
        assert_eq!(settings.record_type, Some(RecordType::Blocks));
    }

    #[test]
    fn test_leveldb_is_not_a_browser() {
        let err = ExtractionSettings::from_config(TaskKind::IndexedDb, &config(Some("leveldb"), None, Some("JSON")))
            .unwrap_err();
        assert!(err.to_string().contains("not a browser"));
    }

    #[test]
    fn test_missing_fields() {
        let err = ExtractionSettings::from_config(TaskKind::LevelDb, &config(None, None, Some("JSON"))).unwrap_err();
        assert!(err.to_string().contains("record_type"));

        let err =
            ExtractionSettings::from_config(TaskKind::IndexedDb, &config(Some("chromium"), None, None)).unwrap_err();
        assert!(err.to_string().contains("output_format"));
    }

    #[test]
    fn test_unknown_values() {
        let err = ExtractionSettings::from_config(TaskKind::LevelDb, &config(None, Some("tables"), Some("JSON")))
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownRecordType("tables".to_string()));

        let err = ExtractionSettings::from_config(TaskKind::IndexedDb, &config(Some("chromium"), None, Some("xml")))
            .unwrap_err();
        assert_eq!(err, DomainError::UnknownOutputFormat("xml".to_string()));
    }

    #[test]
    fn test_invocation_from_host_json() {
        let invocation: TaskInvocation = serde_json::from_value(serde_json::json!({
            "input_files": [{"id": 1, "display_name": "fake_firefox.sqlite", "path": "/e/fake_firefox.sqlite"}],
            "output_path": "/out",
            "workflow_id": "fake_workflow_id",
            "task_config": {"browser_type": "firefox", "output_format": "JSONL"}
        }))
        .unwrap();

        assert!(invocation.pipe_result.is_none());
        assert_eq!(invocation.input_files.len(), 1);
        assert_eq!(
            invocation.task_config.unwrap().browser_type.as_deref(),
            Some("firefox")
        );
    }
}
