//! prefvault - Snapshot and restore macOS preference keys
//!
//! This library captures the current values of a configured set of
//! `defaults` keys into durable, timestamped snapshots and reinstates a
//! chosen snapshot later.
//!
//! # Overview
//!
//! prefvault is a pure backup/restore mechanism - it decides nothing about
//! which keys matter or what values are "better". Clients supply a
//! descriptor table and a preference store; the vault only iterates,
//! records, and writes back.
//!
//! # Example
//!
//! ```no_run
//! use prefvault::{
//!     DefaultsStore, DescriptorTable, SettingDescriptor, ValueType, Vault, VaultConfig,
//! };
//!
//! fn main() -> prefvault::Result<()> {
//!     let table = DescriptorTable::new(vec![
//!         SettingDescriptor::new("com.apple.dock", "mineffect", ValueType::String),
//!         SettingDescriptor::new("NSGlobalDomain", "KeyRepeat", ValueType::Integer),
//!     ])?;
//!
//!     let vault = Vault::new(VaultConfig {
//!         root: "/Users/me/.prefvault/backups".into(),
//!     });
//!
//!     let mut store = DefaultsStore::new();
//!
//!     // Capture is non-mutating; the snapshot is durable before this returns
//!     let snapshot = vault.capture(&table, &store)?;
//!
//!     // ...time passes, something rewrites the dock settings...
//!
//!     let report = vault.restore(&snapshot, &mut store);
//!     eprintln!("restored {} setting(s)", report.restored);
//!     Ok(())
//! }
//! ```
//!
//! # Guarantees
//!
//! - Capture persists atomically: either the whole snapshot lands or none
//!   of it does.
//! - Keys absent at capture time are never written back (and never
//!   deleted) on restore.
//! - A single rejected write never aborts a restore; it is counted and
//!   reported per key.

pub mod descriptor;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod vault;

// Re-exports for convenience
pub use descriptor::{DescriptorTable, SettingDescriptor, ValueType};
pub use error::{Result, VaultError};
pub use snapshot::{FailedWrite, RestoreReport, SettingRecord, Snapshot, SnapshotId};
pub use store::{DefaultsStore, MemoryStore, PreferenceStore};
pub use vault::{Vault, VaultConfig};
