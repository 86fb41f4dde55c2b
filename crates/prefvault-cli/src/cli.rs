//! CLI argument definitions for prefvault
//!
//! Uses clap for argument parsing. This module defines all subcommands
//! and their options.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// prefvault - snapshot and restore macOS defaults keys
///
/// Captures the current values of a configured set of preference keys
/// into timestamped snapshots, and reinstates any snapshot later.
#[derive(Parser, Debug)]
#[command(name = "prefvault")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Silent mode - suppress all prefvault output (banner, summaries)
    #[arg(long, short = 's', global = true)]
    pub silent: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture the current value of every tracked preference key
    #[command(after_help = "EXAMPLES:
    # Snapshot the built-in descriptor table
    prefvault backup

    # Use a custom descriptor table
    prefvault backup --table ./my-settings.toml

    # Keep snapshots somewhere other than ~/.prefvault/backups
    prefvault backup --root /Volumes/backup/prefvault

    # Machine-readable capture summary
    prefvault backup --json
")]
    Backup(BackupArgs),

    /// Write a snapshot's captured values back to the live preferences
    #[command(after_help = "EXAMPLES:
    # Restore the most recent snapshot (asks for confirmation)
    prefvault restore

    # Restore a specific snapshot by id
    prefvault restore 20260823_143022

    # See what would be written without touching anything
    prefvault restore --dry-run

    # Non-interactive restore (scripts)
    prefvault restore --yes --silent
")]
    Restore(RestoreArgs),

    /// List persisted snapshots
    #[command(after_help = "EXAMPLES:
    # All snapshots, oldest first
    prefvault list

    # Only the 5 most recent
    prefvault list --recent 5

    # JSON output
    prefvault list --json
")]
    List(ListArgs),

    /// Show the records of one snapshot
    #[command(after_help = "EXAMPLES:
    # Human-readable dump
    prefvault show 20260823_143022

    # JSON output
    prefvault show 20260823_143022 --json
")]
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct BackupArgs {
    /// Snapshot storage directory (default: ~/.prefvault/backups)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Descriptor table file (default: user table, then built-in)
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    /// Output the capture summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Parser, Debug)]
pub struct RestoreArgs {
    /// Snapshot id (e.g. 20260823_143022); defaults to the latest snapshot
    pub snapshot: Option<String>,

    /// Snapshot storage directory (default: ~/.prefvault/backups)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Show what would be written without modifying any preference
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Output the restore report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Snapshot storage directory (default: ~/.prefvault/backups)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Show only the N most recent snapshots
    #[arg(long, value_name = "N")]
    pub recent: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Snapshot id (e.g. 20260823_143022)
    pub snapshot: String,

    /// Snapshot storage directory (default: ~/.prefvault/backups)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
