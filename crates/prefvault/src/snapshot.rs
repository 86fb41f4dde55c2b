//! Snapshot model and wire format
//!
//! A snapshot is a newline-delimited text file, one captured setting per
//! line: `domain key -type value`. The value is everything after the third
//! space, so values may contain spaces but not newlines. Keys that were
//! absent at capture time are not serialized; absence is represented by
//! omission. File names embed the capture time
//! (`defaults_backup_<YYYYMMDD>_<HHMMSS>.txt`) and that embedded timestamp,
//! not filesystem mtime, orders snapshots.

use crate::descriptor::{SettingDescriptor, ValueType};
use crate::error::{Result, VaultError};
use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// File name prefix for persisted snapshots
const FILE_PREFIX: &str = "defaults_backup_";
/// File name extension for persisted snapshots
const FILE_EXT: &str = ".txt";
/// Timestamp layout inside ids and file names
const ID_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Timestamp-derived snapshot identifier.
///
/// Ids order by capture time; two captures in the same wall-clock second
/// would collide, which the vault refuses (snapshots are never replaced).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(NaiveDateTime);

impl SnapshotId {
    #[must_use]
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        // Truncate to whole seconds; the id format has no finer resolution
        Self(timestamp.with_nanosecond(0).unwrap_or(timestamp))
    }

    #[must_use]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.0
    }

    /// File name this snapshot is persisted under.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{FILE_PREFIX}{}{FILE_EXT}", self)
    }

    /// Parse a snapshot id back out of a persisted file name.
    ///
    /// Returns `None` for files that are not snapshots (wrong prefix,
    /// extension, or timestamp), so directory scans can skip them.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_EXT)?;
        stem.parse().ok()
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(ID_FORMAT))
    }
}

impl FromStr for SnapshotId {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(s, ID_FORMAT)
            .map(Self)
            .map_err(|_| VaultError::InvalidSnapshotId(s.to_string()))
    }
}

/// One captured observation of a descriptor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingRecord {
    pub descriptor: SettingDescriptor,
    /// Captured textual value; `None` means the key was absent at capture
    /// time and must never be written back on restore.
    pub value: Option<String>,
}

impl SettingRecord {
    #[must_use]
    pub fn present_at_capture(&self) -> bool {
        self.value.is_some()
    }

    /// Render the wire line for this record, or `None` for absent records.
    #[must_use]
    pub fn to_line(&self) -> Option<String> {
        self.value.as_ref().map(|v| {
            format!(
                "{} {} {} {}",
                self.descriptor.domain, self.descriptor.key, self.descriptor.value_type, v
            )
        })
    }

    /// Parse one wire line into a record.
    ///
    /// Four whitespace-separated logical fields; the value is the remainder
    /// of the line after the third space.
    pub fn parse_line(line_no: usize, line: &str) -> Result<Self> {
        let malformed = |reason: &str| VaultError::MalformedRecord {
            line: line_no,
            reason: reason.to_string(),
        };

        let mut parts = line.splitn(4, ' ');
        let domain = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| malformed("missing domain"))?;
        let key = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| malformed("missing key"))?;
        let flag = parts.next().filter(|s| !s.is_empty()).ok_or_else(|| malformed("missing value type"))?;
        let value = parts.next().ok_or_else(|| malformed("missing value"))?;

        let value_type = ValueType::from_flag(flag).map_err(|_| {
            malformed(&format!("unknown value type {flag:?}"))
        })?;

        Ok(Self {
            descriptor: SettingDescriptor::new(domain, key, value_type),
            value: Some(value.to_string()),
        })
    }
}

/// A line that failed to parse when a snapshot was loaded from disk.
#[derive(Clone, Debug, Serialize)]
pub struct SkippedLine {
    pub line: usize,
    pub reason: String,
}

/// An immutable, timestamped capture of descriptor values.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub id: SnapshotId,
    pub created_at: NaiveDateTime,
    /// Records in descriptor-table order at capture time
    pub records: Vec<SettingRecord>,
    /// Lines skipped as malformed when loading from disk (empty for
    /// freshly captured snapshots)
    pub skipped_lines: Vec<SkippedLine>,
}

impl Snapshot {
    /// Serialize to the wire format. Absent records produce no line.
    #[must_use]
    pub fn to_wire(&self) -> String {
        let mut out = String::new();
        for record in &self.records {
            if let Some(line) = record.to_line() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out
    }

    /// Parse wire-format contents.
    ///
    /// Lenient: malformed lines are logged, recorded in `skipped_lines`,
    /// and dropped. Blank lines are ignored outright.
    #[must_use]
    pub fn from_wire(id: SnapshotId, contents: &str) -> Self {
        let mut records = Vec::new();
        let mut skipped_lines = Vec::new();

        for (idx, line) in contents.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            match SettingRecord::parse_line(line_no, line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed record on line {line_no}: {e}");
                    skipped_lines.push(SkippedLine {
                        line: line_no,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Self {
            id,
            created_at: id.timestamp(),
            records,
            skipped_lines,
        }
    }

    /// Count of records that were present at capture time.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.records.iter().filter(|r| r.present_at_capture()).count()
    }

    /// Count of records whose key was absent at capture time.
    #[must_use]
    pub fn absent_count(&self) -> usize {
        self.records.len() - self.present_count()
    }
}

/// A write that failed during restore.
#[derive(Clone, Debug, Serialize)]
pub struct FailedWrite {
    pub domain: String,
    pub key: String,
    pub error: String,
}

/// Outcome of one restore pass.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RestoreReport {
    /// Records written back successfully
    pub restored: usize,
    /// Records skipped because the key was absent at capture time
    pub skipped_absent: usize,
    /// Lines skipped as malformed when the snapshot was loaded
    pub malformed: usize,
    /// Writes the preference store rejected
    pub failed: Vec<FailedWrite>,
}

impl RestoreReport {
    /// True when every well-formed present record was applied.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.malformed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn id_at(h: u32, m: u32, s: u32) -> SnapshotId {
        SnapshotId::from_timestamp(
            NaiveDate::from_ymd_opt(2026, 8, 23)
                .expect("date")
                .and_hms_opt(h, m, s)
                .expect("time"),
        )
    }

    #[test]
    fn id_file_name_roundtrip() {
        let id = id_at(14, 30, 22);
        assert_eq!(id.file_name(), "defaults_backup_20260823_143022.txt");
        assert_eq!(
            SnapshotId::from_file_name("defaults_backup_20260823_143022.txt"),
            Some(id)
        );
    }

    #[test]
    fn id_rejects_foreign_file_names() {
        assert!(SnapshotId::from_file_name("notes.txt").is_none());
        assert!(SnapshotId::from_file_name("defaults_backup_garbage.txt").is_none());
        assert!(SnapshotId::from_file_name("defaults_backup_20260823_143022.json").is_none());
    }

    #[test]
    fn id_orders_by_embedded_timestamp() {
        assert!(id_at(9, 0, 0) < id_at(9, 0, 1));
        assert!(id_at(9, 0, 0) < id_at(10, 0, 0));
    }

    #[test]
    fn id_display_parse_roundtrip() {
        let id = id_at(7, 5, 9);
        let shown = id.to_string();
        assert_eq!(shown, "20260823_070509");
        assert_eq!(shown.parse::<SnapshotId>().expect("parse"), id);
    }

    #[test]
    fn id_parse_rejects_invalid_string() {
        // A string that never parsed is an invalid id, not a missing snapshot
        let err = "zzz".parse::<SnapshotId>().expect_err("must reject");
        assert!(matches!(err, VaultError::InvalidSnapshotId(_)));
        assert!(matches!(
            "2026-08-23 14:30:22".parse::<SnapshotId>(),
            Err(VaultError::InvalidSnapshotId(_))
        ));
    }

    #[test]
    fn parse_line_concrete_scenario() {
        let record =
            SettingRecord::parse_line(1, "com.apple.dock mineffect -string genie").expect("parse");
        assert_eq!(record.descriptor.domain, "com.apple.dock");
        assert_eq!(record.descriptor.key, "mineffect");
        assert_eq!(record.descriptor.value_type, ValueType::String);
        assert_eq!(record.value.as_deref(), Some("genie"));
    }

    #[test]
    fn parse_line_value_keeps_spaces() {
        let record = SettingRecord::parse_line(
            1,
            "com.apple.dock persistent-apps -string Safari and Friends",
        )
        .expect("parse");
        assert_eq!(record.value.as_deref(), Some("Safari and Friends"));
    }

    #[test]
    fn parse_line_too_few_fields() {
        let err = SettingRecord::parse_line(3, "com.apple.dock mineffect").expect_err("malformed");
        match err {
            VaultError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }

    #[test]
    fn parse_line_bad_type_flag() {
        assert!(SettingRecord::parse_line(1, "com.apple.dock mineffect -array genie").is_err());
    }

    #[test]
    fn record_line_roundtrip() {
        let line = "NSGlobalDomain NSWindowResizeTime -float 0.001";
        let record = SettingRecord::parse_line(1, line).expect("parse");
        assert_eq!(record.to_line().as_deref(), Some(line));
    }

    #[test]
    fn absent_record_serializes_to_nothing() {
        let record = SettingRecord {
            descriptor: SettingDescriptor::new("com.apple.Foo", "Bar", ValueType::Boolean),
            value: None,
        };
        assert!(record.to_line().is_none());
        assert!(!record.present_at_capture());
    }

    #[test]
    fn wire_roundtrip_skips_absent_and_keeps_order() {
        let snapshot = Snapshot {
            id: id_at(12, 0, 0),
            created_at: id_at(12, 0, 0).timestamp(),
            records: vec![
                SettingRecord {
                    descriptor: SettingDescriptor::new(
                        "com.apple.dock",
                        "mineffect",
                        ValueType::String,
                    ),
                    value: Some("genie".to_string()),
                },
                SettingRecord {
                    descriptor: SettingDescriptor::new("com.apple.Foo", "Bar", ValueType::Boolean),
                    value: None,
                },
                SettingRecord {
                    descriptor: SettingDescriptor::new(
                        "NSGlobalDomain",
                        "KeyRepeat",
                        ValueType::Integer,
                    ),
                    value: Some("2".to_string()),
                },
            ],
            skipped_lines: Vec::new(),
        };

        let wire = snapshot.to_wire();
        assert_eq!(
            wire,
            "com.apple.dock mineffect -string genie\nNSGlobalDomain KeyRepeat -int 2\n"
        );

        let loaded = Snapshot::from_wire(snapshot.id, &wire);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0].descriptor.key, "mineffect");
        assert_eq!(loaded.records[1].descriptor.key, "KeyRepeat");
        assert!(loaded.skipped_lines.is_empty());
    }

    #[test]
    fn from_wire_tolerates_corrupt_line() {
        let contents = "com.apple.dock mineffect -string genie\n\
                        broken line\n\
                        NSGlobalDomain KeyRepeat -int 2\n";
        let snapshot = Snapshot::from_wire(id_at(8, 0, 0), contents);
        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.skipped_lines.len(), 1);
        assert_eq!(snapshot.skipped_lines[0].line, 2);
    }

    #[test]
    fn from_wire_ignores_blank_lines() {
        let snapshot =
            Snapshot::from_wire(id_at(8, 0, 0), "\ncom.apple.dock mineffect -string genie\n\n");
        assert_eq!(snapshot.records.len(), 1);
        assert!(snapshot.skipped_lines.is_empty());
    }
}
