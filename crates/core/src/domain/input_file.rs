// Input File Reference

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File handed to a task by the host
///
/// Mirrors the host's file dictionaries; fields the pipeline does not need
/// are optional and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFile {
    /// Opaque source identifier (numeric in most hosts)
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub uuid: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    pub path: PathBuf,
    #[serde(default)]
    pub original_path: Option<PathBuf>,
}

impl InputFile {
    pub fn new(display_name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id: None,
            uuid: None,
            display_name: display_name.into(),
            extension: None,
            data_type: None,
            path: path.into(),
            original_path: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<serde_json::Value>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_host_dictionary() {
        let file: InputFile = serde_json::from_value(serde_json::json!({
            "id": 1,
            "uuid": "6b5856b3ddf3463aa74197dffbc88f95",
            "display_name": "000005.ldb",
            "extension": "ldb",
            "data_type": "file:generic",
            "path": "./test_data/leveldb/000005.ldb",
            "hash_sha256": "ignored"
        }))
        .unwrap();

        assert_eq!(file.display_name, "000005.ldb");
        assert_eq!(file.id, Some(serde_json::json!(1)));
        assert_eq!(file.path, PathBuf::from("./test_data/leveldb/000005.ldb"));
        assert!(file.original_path.is_none());
    }

    #[test]
    fn test_minimal_dictionary() {
        let file: InputFile = serde_json::from_value(serde_json::json!({
            "display_name": "IndexedDB.sqlite3",
            "path": "/evidence/IndexedDB.sqlite3"
        }))
        .unwrap();

        assert_eq!(file, InputFile::new("IndexedDB.sqlite3", "/evidence/IndexedDB.sqlite3"));
    }
}
