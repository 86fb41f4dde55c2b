//! Settings vault: capture and restore of preference snapshots
//!
//! The vault is stateless apart from its storage root, fixed at
//! construction. `capture` reads every descriptor through the preference
//! store, assembles a snapshot, and persists it atomically (temp file +
//! rename) before returning. `restore` writes present records back one by
//! one, recording per-key failures without aborting the batch.

use crate::descriptor::DescriptorTable;
use crate::error::{Result, VaultError};
use crate::snapshot::{FailedWrite, RestoreReport, SettingRecord, Snapshot, SnapshotId};
use crate::store::PreferenceStore;
use std::fs;
use std::path::{Path, PathBuf};

/// Vault configuration, passed in explicitly at construction.
///
/// There are no implicit process-wide defaults; callers decide where
/// snapshots live.
#[derive(Clone, Debug)]
pub struct VaultConfig {
    /// Directory that holds snapshot files. Created on first capture.
    pub root: PathBuf,
}

/// Captures preference snapshots and reinstates them.
#[derive(Debug)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    #[must_use]
    pub fn new(config: VaultConfig) -> Self {
        Self { root: config.root }
    }

    /// Snapshot storage root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Capture the current value of every descriptor, in table order.
    ///
    /// Keys absent from the store produce an advisory warning and an
    /// absent record; they will not be restorable later. The snapshot is
    /// durably written before this returns. Capture never mutates live
    /// preferences.
    pub fn capture(
        &self,
        table: &DescriptorTable,
        store: &dyn PreferenceStore,
    ) -> Result<Snapshot> {
        let created_at = chrono::Local::now().naive_local();
        let id = SnapshotId::from_timestamp(created_at);

        let mut records = Vec::with_capacity(table.len());
        for descriptor in table.iter() {
            let value = store.read(&descriptor.domain, &descriptor.key)?;
            if value.is_none() {
                tracing::warn!(
                    "{descriptor} is not set on this system and will not be restorable"
                );
            }
            records.push(SettingRecord {
                descriptor: descriptor.clone(),
                value,
            });
        }

        let snapshot = Snapshot {
            id,
            created_at: id.timestamp(),
            records,
            skipped_lines: Vec::new(),
        };

        self.persist(&snapshot)?;
        Ok(snapshot)
    }

    /// List persisted snapshot ids, oldest first.
    ///
    /// Ordered by the timestamp embedded in each file name; filesystem
    /// mtime is never consulted. Files that are not snapshots are skipped.
    pub fn list(&self) -> Result<Vec<SnapshotId>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(VaultError::Storage(format!(
                    "failed to read snapshot directory {}: {e}",
                    self.root.display()
                )))
            }
        };

        let mut ids: Vec<SnapshotId> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(SnapshotId::from_file_name)
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Resolve "latest" to the most recently captured persisted snapshot.
    pub fn resolve_latest(&self) -> Result<SnapshotId> {
        self.list()?
            .pop()
            .ok_or_else(|| VaultError::NoSnapshots(self.root.clone()))
    }

    /// Load a persisted snapshot by id.
    ///
    /// The parse is lenient: malformed lines are warned about and recorded
    /// on the snapshot, never fatal.
    pub fn load(&self, id: SnapshotId) -> Result<Snapshot> {
        let path = self.root.join(id.file_name());
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VaultError::SnapshotNotFound(id.to_string()))
            }
            Err(e) => {
                return Err(VaultError::Storage(format!(
                    "failed to read snapshot {}: {e}",
                    path.display()
                )))
            }
        };
        Ok(Snapshot::from_wire(id, &contents))
    }

    /// Write a snapshot's captured values back to the preference store.
    ///
    /// Records are applied in stored order. Absent records are skipped --
    /// never written, never deleted. A rejected write is logged, recorded
    /// in the report, and does not stop the remaining records. Restoring
    /// the same snapshot twice yields the same store state as once.
    pub fn restore(&self, snapshot: &Snapshot, store: &mut dyn PreferenceStore) -> RestoreReport {
        let mut report = RestoreReport {
            malformed: snapshot.skipped_lines.len(),
            ..RestoreReport::default()
        };

        for record in &snapshot.records {
            let descriptor = &record.descriptor;
            match &record.value {
                None => {
                    tracing::debug!("{descriptor} was absent at capture; leaving untouched");
                    report.skipped_absent += 1;
                }
                Some(raw) => {
                    match store.write(&descriptor.domain, &descriptor.key, descriptor.value_type, raw)
                    {
                        Ok(()) => report.restored += 1,
                        Err(e) => {
                            tracing::warn!("Failed to restore {descriptor}: {e}");
                            report.failed.push(FailedWrite {
                                domain: descriptor.domain.clone(),
                                key: descriptor.key.clone(),
                                error: e.to_string(),
                            });
                        }
                    }
                }
            }
        }

        report
    }

    /// Persist a snapshot under its id-derived file name.
    ///
    /// Written via temp file + rename so interrupted captures never leave
    /// a partial file a later restore would treat as complete. An existing
    /// file for the same id is never replaced.
    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| {
            VaultError::Storage(format!(
                "failed to create snapshot directory {}: {e}",
                self.root.display()
            ))
        })?;

        let path = self.root.join(snapshot.id.file_name());
        if path.exists() {
            return Err(VaultError::Storage(format!(
                "snapshot {} already exists; snapshots are never replaced",
                path.display()
            )));
        }

        atomic_write(&path, snapshot.to_wire().as_bytes())
    }
}

/// Write content to a file atomically via temp file + rename.
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        VaultError::Storage(format!("path has no parent directory: {}", path.display()))
    })?;

    let temp_path = parent.join(format!(".tmp-{}", std::process::id()));

    let write_result = (|| -> Result<()> {
        let mut file = fs::File::create(&temp_path).map_err(|e| {
            VaultError::Storage(format!(
                "failed to create temp file {}: {e}",
                temp_path.display()
            ))
        })?;
        use std::io::Write;
        file.write_all(content).map_err(|e| {
            VaultError::Storage(format!(
                "failed to write temp file {}: {e}",
                temp_path.display()
            ))
        })?;
        file.sync_all().map_err(|e| {
            VaultError::Storage(format!(
                "failed to sync temp file {}: {e}",
                temp_path.display()
            ))
        })?;
        Ok(())
    })();

    if let Err(e) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        VaultError::Storage(format!(
            "failed to rename {} to {}: {e}",
            temp_path.display(),
            path.display()
        ))
    })
}
