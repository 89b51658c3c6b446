// Type Classifier
//
// Maps a display name to the tool subcommand for a family. Pure; patterns
// are compiled once per process.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::domain::{FileKind, ProductFamily, RecordType};

/// Supported file with the subcommand that handles it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: FileKind,
    /// Validated against the kind's allowed set (record-type families only)
    pub record_type: Option<RecordType>,
}

impl Classification {
    pub fn subcommand(&self) -> &'static str {
        self.kind.subcommand()
    }

    pub fn allowed_record_types(&self) -> &'static [RecordType] {
        self.kind.allowed_record_types()
    }
}

/// Why a file was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedReason {
    NoMatchingPattern,
    MissingRecordType(FileKind),
    RecordTypeNotAllowed { kind: FileKind, record_type: RecordType },
}

impl std::fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedReason::NoMatchingPattern => write!(f, "unsupported file type"),
            UnsupportedReason::MissingRecordType(kind) => {
                write!(f, "no record type given for {} file", kind.subcommand())
            }
            UnsupportedReason::RecordTypeNotAllowed { kind, record_type } => write!(
                f,
                "unsupported record type {} for {} file",
                record_type,
                kind.subcommand()
            ),
        }
    }
}

/// Classification outcome; Unsupported is a skip, never a batch error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyOutcome {
    Supported(Classification),
    Unsupported(UnsupportedReason),
}

type CompiledPatterns = HashMap<ProductFamily, Vec<(FileKind, Regex)>>;

fn compiled_patterns(family: ProductFamily) -> &'static [(FileKind, Regex)] {
    static PATTERNS: OnceLock<CompiledPatterns> = OnceLock::new();
    let table = PATTERNS.get_or_init(|| {
        [
            ProductFamily::Chromium,
            ProductFamily::Firefox,
            ProductFamily::Safari,
            ProductFamily::LevelDb,
        ]
        .into_iter()
        .map(|f| {
            let compiled = f
                .descriptor()
                .patterns
                .iter()
                .map(|(kind, pattern)| {
                    (*kind, Regex::new(pattern).expect("file pattern regex is valid"))
                })
                .collect();
            (f, compiled)
        })
        .collect()
    });
    table.get(&family).map(Vec::as_slice).unwrap_or(&[])
}

/// Match `display_name` against the family's patterns in declaration order
pub fn match_kind(display_name: &str, family: ProductFamily) -> Option<FileKind> {
    compiled_patterns(family)
        .iter()
        .find(|(_, re)| re.is_match(display_name))
        .map(|(kind, _)| *kind)
}

/// Classify one file for `family`
///
/// `record_type` is only consulted for families that require one.
pub fn classify(
    display_name: &str,
    family: ProductFamily,
    record_type: Option<RecordType>,
) -> ClassifyOutcome {
    let Some(kind) = match_kind(display_name, family) else {
        return ClassifyOutcome::Unsupported(UnsupportedReason::NoMatchingPattern);
    };

    if !family.descriptor().requires_record_type {
        return ClassifyOutcome::Supported(Classification {
            kind,
            record_type: None,
        });
    }

    match record_type {
        None => ClassifyOutcome::Unsupported(UnsupportedReason::MissingRecordType(kind)),
        Some(rt) if kind.allowed_record_types().contains(&rt) => {
            ClassifyOutcome::Supported(Classification {
                kind,
                record_type: Some(rt),
            })
        }
        Some(rt) => ClassifyOutcome::Unsupported(UnsupportedReason::RecordTypeNotAllowed {
            kind,
            record_type: rt,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(outcome: ClassifyOutcome) -> Option<FileKind> {
        match outcome {
            ClassifyOutcome::Supported(c) => Some(c.kind),
            ClassifyOutcome::Unsupported(_) => None,
        }
    }

    #[test]
    fn test_chromium_patterns() {
        assert_eq!(
            kind_of(classify("000005.ldb", ProductFamily::Chromium, None)),
            Some(FileKind::Ldb)
        );
        assert_eq!(
            kind_of(classify("000123.log", ProductFamily::Chromium, None)),
            Some(FileKind::Log)
        );
        assert_eq!(kind_of(classify("MANIFEST-000001", ProductFamily::Chromium, None)), None);
        assert_eq!(kind_of(classify("00005.ldb", ProductFamily::Chromium, None)), None);
        assert_eq!(kind_of(classify("000005.ldb.bak", ProductFamily::Chromium, None)), None);
    }

    #[test]
    fn test_firefox_suffix_pattern() {
        assert_eq!(
            kind_of(classify("fake_firefox.sqlite", ProductFamily::Firefox, None)),
            Some(FileKind::Database)
        );
        assert_eq!(kind_of(classify("places.sqlite-wal", ProductFamily::Firefox, None)), None);
        assert_eq!(kind_of(classify("IndexedDB.sqlite3", ProductFamily::Firefox, None)), None);
    }

    #[test]
    fn test_safari_exact_name() {
        assert_eq!(
            kind_of(classify("IndexedDB.sqlite3", ProductFamily::Safari, None)),
            Some(FileKind::Database)
        );
        assert_eq!(kind_of(classify("IndexedDBxsqlite3", ProductFamily::Safari, None)), None);
        assert_eq!(kind_of(classify("old_IndexedDB.sqlite3", ProductFamily::Safari, None)), None);
        assert_eq!(kind_of(classify("fake.sqlite", ProductFamily::Safari, None)), None);
    }

    #[test]
    fn test_leveldb_order_and_kinds() {
        let blocks = Some(RecordType::Blocks);
        assert_eq!(
            kind_of(classify("MANIFEST-000002", ProductFamily::LevelDb, blocks)),
            Some(FileKind::Descriptor)
        );
        assert_eq!(
            kind_of(classify("000005.ldb", ProductFamily::LevelDb, blocks)),
            Some(FileKind::Ldb)
        );
        assert_eq!(
            kind_of(classify("000003.log", ProductFamily::LevelDb, blocks)),
            Some(FileKind::Log)
        );
        assert_eq!(kind_of(classify("CURRENT", ProductFamily::LevelDb, blocks)), None);
        assert_eq!(kind_of(classify("MANIFEST-000002.bak", ProductFamily::LevelDb, blocks)), None);
    }

    #[test]
    fn test_leveldb_record_type_sets_are_exact() {
        let cases = [
            ("000003.log", FileKind::Log),
            ("000005.ldb", FileKind::Ldb),
            ("MANIFEST-000001", FileKind::Descriptor),
        ];
        for (name, kind) in cases {
            for rt in RecordType::ALL {
                let outcome = classify(name, ProductFamily::LevelDb, Some(rt));
                let allowed = kind.allowed_record_types().contains(&rt);
                match outcome {
                    ClassifyOutcome::Supported(c) => {
                        assert!(allowed, "{} accepted for {}", rt, name);
                        assert_eq!(c.record_type, Some(rt));
                    }
                    ClassifyOutcome::Unsupported(reason) => {
                        assert!(!allowed, "{} rejected for {}", rt, name);
                        assert_eq!(
                            reason,
                            UnsupportedReason::RecordTypeNotAllowed { kind, record_type: rt }
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_leveldb_without_record_type() {
        assert_eq!(
            classify("000005.ldb", ProductFamily::LevelDb, None),
            ClassifyOutcome::Unsupported(UnsupportedReason::MissingRecordType(FileKind::Ldb))
        );
    }

    #[test]
    fn test_browser_families_ignore_record_type() {
        let outcome = classify("000005.ldb", ProductFamily::Chromium, Some(RecordType::VersionEdit));
        assert_eq!(
            outcome,
            ClassifyOutcome::Supported(Classification {
                kind: FileKind::Ldb,
                record_type: None
            })
        );
    }

    #[test]
    fn test_reason_messages() {
        let reason = UnsupportedReason::RecordTypeNotAllowed {
            kind: FileKind::Ldb,
            record_type: RecordType::WriteBatches,
        };
        assert_eq!(reason.to_string(), "unsupported record type write_batches for ldb file");
    }
}
