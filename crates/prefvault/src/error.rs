//! Error types for the prefvault library

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the prefvault library
#[derive(Error, Debug)]
pub enum VaultError {
    // Snapshot storage errors (fatal to the operation that hit them)
    #[error("Snapshot storage error: {0}")]
    Storage(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Invalid snapshot id: {0} (expected YYYYMMDD_HHMMSS)")]
    InvalidSnapshotId(String),

    #[error("No snapshots found in {0}")]
    NoSnapshots(PathBuf),

    // Per-record errors (recovered locally, surfaced in reports)
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Failed to write {domain} {key}: {reason}")]
    PreferenceWrite {
        domain: String,
        key: String,
        reason: String,
    },

    // Preference store access errors
    #[error("Preference store access failed: {0}")]
    StoreAccess(String),

    // Descriptor table errors
    #[error("Duplicate descriptor: {domain} {key}")]
    DuplicateDescriptor { domain: String, key: String },

    #[error("Invalid descriptor {domain} {key}: {reason}")]
    InvalidDescriptor {
        domain: String,
        key: String,
        reason: String,
    },

    #[error("Descriptor table parse error: {0}")]
    DescriptorParse(String),

    #[error("Unknown value type: {0}")]
    UnknownValueType(String),

    // CLI-level but useful in library
    #[error("Home directory not found")]
    HomeNotFound,

    #[error("Restore requires --yes in silent mode")]
    ConfirmationRequired,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for prefvault operations
pub type Result<T> = std::result::Result<T, VaultError>;
