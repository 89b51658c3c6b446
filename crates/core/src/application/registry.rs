// Task Registry
//
// Registration metadata the host renders as a configuration form. Pure data;
// the pipeline never reads it.

use serde::Serialize;
use std::collections::BTreeSet;

use super::constants::TASK_NAME_PREFIX;
use crate::domain::{DomainError, FileKind, OutputFormat, ProductFamily, RecordType, TaskKind};

/// One user-configurable field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub name: String,
    pub label: String,
    pub description: String,
    pub items: Vec<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    pub required: bool,
}

impl ConfigField {
    fn select(name: &str, label: &str, description: &str, items: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            items,
            field_type: "select".to_string(),
            required: true,
        }
    }
}

/// Host registration record of one task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDefinition {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub task_config: Vec<ConfigField>,
}

fn output_format_field() -> ConfigField {
    ConfigField::select(
        "output_format",
        "Select output format",
        "The output format",
        OutputFormat::ALL.iter().map(|f| f.label().to_string()).collect(),
    )
}

impl TaskKind {
    /// Fully qualified name used for routing
    pub fn task_name(&self) -> String {
        format!("{}.{}", TASK_NAME_PREFIX, self.short_name())
    }

    /// Accepts both the routing name and the short name
    pub fn from_task_name(name: &str) -> Result<Self, DomainError> {
        let short = name
            .strip_prefix(TASK_NAME_PREFIX)
            .and_then(|rest| rest.strip_prefix('.'))
            .unwrap_or(name);
        short.parse()
    }

    pub fn definition(&self) -> TaskDefinition {
        match self {
            TaskKind::IndexedDb => TaskDefinition {
                name: self.task_name(),
                display_name: "dfindexeddb: indexeddb".to_string(),
                description: "Extracts IndexedDB records using dfindexeddb.".to_string(),
                task_config: vec![
                    ConfigField::select(
                        "browser_type",
                        "Select browser type",
                        "The browser type",
                        ProductFamily::BROWSERS
                            .iter()
                            .map(|f| f.as_str().to_string())
                            .collect(),
                    ),
                    output_format_field(),
                ],
            },
            TaskKind::LevelDb => {
                let record_types: BTreeSet<&str> = [FileKind::Descriptor, FileKind::Ldb, FileKind::Log]
                    .iter()
                    .flat_map(|kind| kind.allowed_record_types())
                    .map(RecordType::as_str)
                    .collect();

                TaskDefinition {
                    name: self.task_name(),
                    display_name: "dfindexeddb: leveldb".to_string(),
                    description: "Extracts LevelDB records using dfleveldb".to_string(),
                    task_config: vec![
                        ConfigField::select(
                            "record_type",
                            "Record Type",
                            "The record type to extract",
                            record_types.into_iter().map(String::from).collect(),
                        ),
                        output_format_field(),
                    ],
                }
            }
        }
    }
}

/// Definitions of every task this worker serves
pub fn all_definitions() -> Vec<TaskDefinition> {
    TaskKind::ALL.iter().map(TaskKind::definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_names_round_trip() {
        for kind in TaskKind::ALL {
            assert_eq!(TaskKind::from_task_name(&kind.task_name()), Ok(kind));
            assert_eq!(TaskKind::from_task_name(kind.short_name()), Ok(kind));
        }
        assert_eq!(
            TaskKind::IndexedDb.task_name(),
            "dfextract-worker.tasks.indexeddb"
        );
        assert!(TaskKind::from_task_name("dfextract-worker.tasks.plaso").is_err());
    }

    #[test]
    fn test_indexeddb_form() {
        let def = TaskKind::IndexedDb.definition();
        assert_eq!(def.task_config.len(), 2);
        assert_eq!(def.task_config[0].name, "browser_type");
        assert_eq!(def.task_config[0].items, vec!["chromium", "firefox", "safari"]);
        assert_eq!(def.task_config[1].items, vec!["JSON", "JSONL", "REPR"]);
        assert!(def.task_config.iter().all(|f| f.required));
    }

    #[test]
    fn test_leveldb_record_types_are_deduplicated_union() {
        let def = TaskKind::LevelDb.definition();
        let items = &def.task_config[0].items;
        assert_eq!(
            items,
            &vec![
                "blocks",
                "parsed_internal_key",
                "physical_records",
                "records",
                "versionedit",
                "write_batches"
            ]
        );
    }

    #[test]
    fn test_definition_serializes_type_key() {
        let value = serde_json::to_value(all_definitions()).unwrap();
        assert_eq!(value[0]["task_config"][0]["type"], "select");
        assert_eq!(value[1]["name"], "dfextract-worker.tasks.leveldb");
    }
}
