// Product Family Domain Model
//
// Families are a closed set. Everything that differs between them lives in
// the static descriptor table below, so the pipeline has a single code path.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::DomainError;

/// External extraction tool a family is handled by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    IndexedDb,
    LevelDb,
}

impl Tool {
    /// Default executable name
    pub fn default_program(&self) -> &'static str {
        match self {
            Tool::IndexedDb => "dfindexeddb",
            Tool::LevelDb => "dfleveldb",
        }
    }
}

/// Browser or engine specific artifact convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductFamily {
    Chromium,
    Firefox,
    Safari,
    LevelDb,
}

impl ProductFamily {
    pub const BROWSERS: [ProductFamily; 3] = [
        ProductFamily::Chromium,
        ProductFamily::Firefox,
        ProductFamily::Safari,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductFamily::Chromium => "chromium",
            ProductFamily::Firefox => "firefox",
            ProductFamily::Safari => "safari",
            ProductFamily::LevelDb => "leveldb",
        }
    }

    pub fn descriptor(&self) -> &'static FamilyDescriptor {
        match self {
            ProductFamily::Chromium => &CHROMIUM,
            ProductFamily::Firefox => &FIREFOX,
            ProductFamily::Safari => &SAFARI,
            ProductFamily::LevelDb => &LEVELDB,
        }
    }
}

impl std::fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProductFamily {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" => Ok(ProductFamily::Chromium),
            "firefox" => Ok(ProductFamily::Firefox),
            "safari" => Ok(ProductFamily::Safari),
            "leveldb" => Ok(ProductFamily::LevelDb),
            _ => Err(DomainError::UnknownFamily(s.to_string())),
        }
    }
}

/// Role a file plays within a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Write-ahead journal (`NNNNNN.log`)
    Log,
    /// Sorted table (`NNNNNN.ldb`)
    Ldb,
    /// Manifest (`MANIFEST-NNNNNN`)
    Descriptor,
    /// Whole IndexedDB container (sqlite backed)
    Database,
}

impl FileKind {
    /// Tool subcommand handling this kind
    pub fn subcommand(&self) -> &'static str {
        match self {
            FileKind::Log => "log",
            FileKind::Ldb => "ldb",
            FileKind::Descriptor => "descriptor",
            FileKind::Database => "db",
        }
    }

    /// Record types the LevelDB tool can decode from this kind
    pub fn allowed_record_types(&self) -> &'static [RecordType] {
        match self {
            FileKind::Log => &[
                RecordType::Blocks,
                RecordType::PhysicalRecords,
                RecordType::WriteBatches,
                RecordType::ParsedInternalKey,
            ],
            FileKind::Ldb => &[RecordType::Blocks, RecordType::Records],
            FileKind::Descriptor => &[
                RecordType::Blocks,
                RecordType::PhysicalRecords,
                RecordType::VersionEdit,
            ],
            FileKind::Database => &[],
        }
    }
}

/// Category of internal structure the LevelDB tool is asked to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Blocks,
    PhysicalRecords,
    WriteBatches,
    ParsedInternalKey,
    Records,
    #[serde(rename = "versionedit")]
    VersionEdit,
}

impl RecordType {
    pub const ALL: [RecordType; 6] = [
        RecordType::Blocks,
        RecordType::PhysicalRecords,
        RecordType::WriteBatches,
        RecordType::ParsedInternalKey,
        RecordType::Records,
        RecordType::VersionEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Blocks => "blocks",
            RecordType::PhysicalRecords => "physical_records",
            RecordType::WriteBatches => "write_batches",
            RecordType::ParsedInternalKey => "parsed_internal_key",
            RecordType::Records => "records",
            RecordType::VersionEdit => "versionedit",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::ALL
            .iter()
            .copied()
            .find(|rt| rt.as_str() == s.trim())
            .ok_or_else(|| DomainError::UnknownRecordType(s.to_string()))
    }
}

/// Which value fills the third segment of the stdout data type label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataTypeQualifier {
    Family,
    RecordType,
}

/// Capability record for one family
#[derive(Debug)]
pub struct FamilyDescriptor {
    pub family: ProductFamily,
    pub tool: Tool,
    /// Checked in order, first match wins
    pub patterns: &'static [(FileKind, &'static str)],
    /// Run the tool on a private copy instead of the original file
    pub needs_staging: bool,
    /// Append `--format <family>` for the generic `db` subcommand
    pub format_flag: bool,
    /// Requires a record type that the matched kind allows
    pub requires_record_type: bool,
    /// Stdout artifact display name gets `.<family>` appended
    pub suffix_display_name: bool,
    pub data_type_qualifier: DataTypeQualifier,
}

static CHROMIUM: FamilyDescriptor = FamilyDescriptor {
    family: ProductFamily::Chromium,
    tool: Tool::IndexedDb,
    patterns: &[
        (FileKind::Ldb, r"[0-9]{6}\.ldb$"),
        (FileKind::Log, r"[0-9]{6}\.log$"),
    ],
    needs_staging: true,
    format_flag: true,
    requires_record_type: false,
    suffix_display_name: true,
    data_type_qualifier: DataTypeQualifier::Family,
};

static FIREFOX: FamilyDescriptor = FamilyDescriptor {
    family: ProductFamily::Firefox,
    tool: Tool::IndexedDb,
    patterns: &[(FileKind::Database, r"\.sqlite$")],
    needs_staging: true,
    format_flag: true,
    requires_record_type: false,
    suffix_display_name: true,
    data_type_qualifier: DataTypeQualifier::Family,
};

static SAFARI: FamilyDescriptor = FamilyDescriptor {
    family: ProductFamily::Safari,
    tool: Tool::IndexedDb,
    patterns: &[(FileKind::Database, r"^IndexedDB\.sqlite3$")],
    needs_staging: true,
    format_flag: true,
    requires_record_type: false,
    suffix_display_name: true,
    data_type_qualifier: DataTypeQualifier::Family,
};

static LEVELDB: FamilyDescriptor = FamilyDescriptor {
    family: ProductFamily::LevelDb,
    tool: Tool::LevelDb,
    patterns: &[
        (FileKind::Descriptor, r"^MANIFEST-[0-9]{6}$"),
        (FileKind::Ldb, r"[0-9]{6}\.ldb$"),
        (FileKind::Log, r"[0-9]{6}\.log$"),
    ],
    needs_staging: false,
    format_flag: false,
    requires_record_type: true,
    suffix_display_name: false,
    data_type_qualifier: DataTypeQualifier::RecordType,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_parse_is_case_insensitive() {
        assert_eq!("Firefox".parse::<ProductFamily>(), Ok(ProductFamily::Firefox));
        assert_eq!(" chromium ".parse::<ProductFamily>(), Ok(ProductFamily::Chromium));
        assert!(matches!(
            "opera".parse::<ProductFamily>(),
            Err(DomainError::UnknownFamily(_))
        ));
    }

    #[test]
    fn test_record_type_names() {
        for rt in RecordType::ALL {
            assert_eq!(rt.as_str().parse::<RecordType>(), Ok(rt));
        }
        assert_eq!(
            serde_json::to_value(RecordType::VersionEdit).unwrap(),
            serde_json::json!("versionedit")
        );
        assert!("version_edit".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_only_leveldb_requires_record_type() {
        for family in ProductFamily::BROWSERS {
            let d = family.descriptor();
            assert_eq!(d.family, family);
            assert!(d.needs_staging);
            assert!(!d.requires_record_type);
            assert_eq!(d.tool, Tool::IndexedDb);
        }
        let d = ProductFamily::LevelDb.descriptor();
        assert!(d.requires_record_type);
        assert!(!d.needs_staging);
        assert_eq!(d.tool.default_program(), "dfleveldb");
    }

    #[test]
    fn test_database_kind_has_no_record_types() {
        assert!(FileKind::Database.allowed_record_types().is_empty());
        assert_eq!(FileKind::Database.subcommand(), "db");
    }
}
