//! Subcommand implementations
//!
//! Handles `prefvault backup|restore|list|show`.

use crate::cli::{BackupArgs, ListArgs, RestoreArgs, ShowArgs};
use crate::output::{self, prefix};
use crate::table;
use colored::Colorize;
use prefvault::{
    DefaultsStore, Result, SnapshotId, Vault, VaultConfig, VaultError,
};
use std::path::PathBuf;

/// Resolve the snapshot storage root: --root or ~/.prefvault/backups.
fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    match root {
        Some(root) => Ok(root),
        None => {
            let home = dirs::home_dir().ok_or(VaultError::HomeNotFound)?;
            Ok(home.join(".prefvault").join("backups"))
        }
    }
}

fn open_vault(root: Option<PathBuf>) -> Result<Vault> {
    Ok(Vault::new(VaultConfig {
        root: resolve_root(root)?,
    }))
}

// ---------------------------------------------------------------------------
// prefvault backup
// ---------------------------------------------------------------------------

pub fn cmd_backup(args: BackupArgs, silent: bool) -> Result<()> {
    let table = table::load_table(args.table.as_deref())?;
    let vault = open_vault(args.root)?;
    let store = DefaultsStore::new();

    // Capture is non-mutating, so no confirmation is asked here
    let snapshot = vault.capture(&table, &store)?;

    if args.json {
        let json = serde_json::json!({
            "snapshot_id": snapshot.id.to_string(),
            "path": vault.root().join(snapshot.id.file_name()),
            "captured": snapshot.present_count(),
            "absent": snapshot.absent_count(),
        });
        println!("{}", serde_json::to_string_pretty(&json).map_err(|e| {
            VaultError::Storage(format!("JSON serialization failed: {e}"))
        })?);
        return Ok(());
    }

    if !silent {
        eprintln!(
            "{} captured {} setting(s) ({} absent on this system)",
            prefix(),
            snapshot.present_count().to_string().green(),
            snapshot.absent_count(),
        );
        if args.verbose > 0 {
            for record in &snapshot.records {
                match &record.value {
                    Some(v) => eprintln!("    {} = {}", record.descriptor, v.green()),
                    None => eprintln!(
                        "    {} {}",
                        record.descriptor,
                        "(not set)".truecolor(150, 150, 150)
                    ),
                }
            }
        }
        eprintln!(
            "{} snapshot {} written to {}",
            prefix(),
            snapshot.id.to_string().white().bold(),
            vault.root().join(snapshot.id.file_name()).display(),
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// prefvault restore
// ---------------------------------------------------------------------------

pub fn cmd_restore(args: RestoreArgs, silent: bool) -> Result<()> {
    let vault = open_vault(args.root)?;

    let id = match args.snapshot {
        Some(ref raw) => raw.parse::<SnapshotId>()?,
        None => vault.resolve_latest()?,
    };
    let snapshot = vault.load(id)?;

    if args.dry_run {
        output::print_dry_run(&snapshot, silent);
        return Ok(());
    }

    // Operator confirmation gate: a restore mutates live preferences
    if !args.yes {
        if silent {
            return Err(VaultError::ConfirmationRequired);
        }
        if !output::prompt_restore_confirmation(&snapshot)? {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let mut store = DefaultsStore::new();
    let report = vault.restore(&snapshot, &mut store);

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).map_err(|e| {
                VaultError::Storage(format!("JSON serialization failed: {e}"))
            })?
        );
    } else {
        output::print_restore_report(&report, silent);
        if !silent && report.restored > 0 {
            eprintln!(
                "{}",
                "Restart Dock/Finder (killall Dock Finder) for UI settings to take effect."
                    .truecolor(150, 150, 150)
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// prefvault list
// ---------------------------------------------------------------------------

pub fn cmd_list(args: ListArgs, silent: bool) -> Result<()> {
    let vault = open_vault(args.root)?;
    let mut ids = vault.list()?;

    if let Some(n) = args.recent {
        let skip = ids.len().saturating_sub(n);
        ids.drain(..skip);
    }

    if args.json {
        let entries: Vec<serde_json::Value> = ids
            .iter()
            .map(|id| {
                serde_json::json!({
                    "snapshot_id": id.to_string(),
                    "created_at": id.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(),
                    "file": id.file_name(),
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&entries).map_err(|e| {
                VaultError::Storage(format!("JSON serialization failed: {e}"))
            })?
        );
        return Ok(());
    }

    if ids.is_empty() {
        if !silent {
            eprintln!("{} No snapshots in {}.", prefix(), vault.root().display());
        }
        return Ok(());
    }

    if !silent {
        eprintln!("{} {} snapshot(s), oldest first\n", prefix(), ids.len());
        for id in &ids {
            // Record count requires reading the file; tolerate unreadable ones
            let records = vault
                .load(*id)
                .map(|s| s.records.len().to_string())
                .unwrap_or_else(|_| "?".to_string());
            eprintln!(
                "  {}  {}  {} record(s)",
                id.to_string().white().bold(),
                id.timestamp()
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .truecolor(150, 150, 150),
                records,
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// prefvault show
// ---------------------------------------------------------------------------

pub fn cmd_show(args: ShowArgs, silent: bool) -> Result<()> {
    let vault = open_vault(args.root)?;
    let id = args.snapshot.parse::<SnapshotId>()?;
    let snapshot = vault.load(id)?;

    if args.json {
        let json = serde_json::json!({
            "snapshot_id": snapshot.id.to_string(),
            "created_at": snapshot.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            "records": snapshot.records,
            "skipped_lines": snapshot.skipped_lines,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).map_err(|e| {
                VaultError::Storage(format!("JSON serialization failed: {e}"))
            })?
        );
        return Ok(());
    }

    if !silent {
        eprintln!(
            "{} snapshot {} ({} record(s))\n",
            prefix(),
            snapshot.id.to_string().white().bold(),
            snapshot.records.len(),
        );
        for record in &snapshot.records {
            if let Some(value) = &record.value {
                eprintln!(
                    "  {} {} {} {}",
                    record.descriptor.domain.white(),
                    record.descriptor.key.white(),
                    record
                        .descriptor
                        .value_type
                        .to_string()
                        .truecolor(150, 150, 150),
                    value,
                );
            }
        }
        for skipped in &snapshot.skipped_lines {
            eprintln!(
                "  {} line {}: {}",
                "skipped".yellow(),
                skipped.line,
                skipped.reason.truecolor(150, 150, 150),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_root_prefers_explicit_path() {
        let root = resolve_root(Some(PathBuf::from("/tmp/custom"))).expect("explicit root");
        assert_eq!(root, PathBuf::from("/tmp/custom"));
    }

    #[test]
    fn resolve_root_defaults_under_home() {
        let root = resolve_root(None).expect("home-derived root");
        assert!(root.ends_with(".prefvault/backups"));
    }

    #[test]
    fn bad_snapshot_id_is_rejected() {
        assert!(matches!(
            "not-a-snapshot".parse::<SnapshotId>(),
            Err(VaultError::InvalidSnapshotId(_))
        ));
        assert!("20260823_143022".parse::<SnapshotId>().is_ok());
    }
}
