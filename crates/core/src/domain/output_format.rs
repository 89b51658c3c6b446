// Output Format Domain Model

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::DomainError;

/// Data type label attached to every captured stderr artifact
pub const STDERR_DATA_TYPE: &str = "plain/txt";

/// Format the extraction tool is asked to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    Json,
    Jsonl,
    Repr,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Json, OutputFormat::Jsonl, OutputFormat::Repr];

    /// Value passed to the tool's `-o` flag
    pub fn as_arg(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Repr => "repr",
        }
    }

    /// Name shown in task configuration forms
    pub fn label(&self) -> &'static str {
        match self {
            OutputFormat::Json => "JSON",
            OutputFormat::Jsonl => "JSONL",
            OutputFormat::Repr => "REPR",
        }
    }

    /// File extension, without the leading dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Repr => "txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/jsonl",
            OutputFormat::Repr => "text/plain",
        }
    }

    /// Extension of the paired stderr artifact
    pub fn error_extension(&self) -> String {
        format!("{}.error.txt", self.extension())
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_arg())
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "jsonl" => Ok(OutputFormat::Jsonl),
            "repr" => Ok(OutputFormat::Repr),
            _ => Err(DomainError::UnknownOutputFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_form_labels() {
        assert_eq!("JSONL".parse::<OutputFormat>(), Ok(OutputFormat::Jsonl));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("Repr".parse::<OutputFormat>(), Ok(OutputFormat::Repr));
        assert!("csv".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_descriptor_table() {
        assert_eq!(OutputFormat::Json.extension(), "json");
        assert_eq!(OutputFormat::Jsonl.mime_type(), "application/jsonl");
        assert_eq!(OutputFormat::Repr.extension(), "txt");
        assert_eq!(OutputFormat::Repr.mime_type(), "text/plain");
        assert_eq!(OutputFormat::Jsonl.error_extension(), "jsonl.error.txt");
    }
}
