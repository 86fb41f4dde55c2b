//! CLI output styling for prefvault

use colored::Colorize;
use prefvault::{RestoreReport, Result, Snapshot, VaultError};
use std::io::{BufRead, IsTerminal, Write};

/// Prefix used for all command output
pub fn prefix() -> colored::ColoredString {
    "[prefvault]".truecolor(95, 135, 215)
}

/// Print the prefvault banner
pub fn print_banner(silent: bool) {
    if silent {
        return;
    }

    let version = env!("CARGO_PKG_VERSION");
    eprintln!();
    eprintln!(
        " {} {}  - snapshot and restore your defaults",
        "prefvault".truecolor(95, 135, 215).bold(),
        format!("v{version}").white()
    );
    eprintln!();
}

/// Ask the operator to confirm a mutating restore.
///
/// Reads a y/N answer from stdin. Only an explicit "y"/"yes" proceeds.
pub fn prompt_restore_confirmation(snapshot: &Snapshot) -> Result<bool> {
    eprintln!(
        "{} About to write {} setting(s) from snapshot {} back to your preferences.",
        prefix(),
        snapshot.present_count().to_string().bold(),
        snapshot.id.to_string().white().bold(),
    );
    eprintln!(
        "{}",
        "Some changes only take effect after the affected apps (Dock, Finder) restart."
            .truecolor(150, 150, 150)
    );
    eprint!("Continue? [y/N] ");
    std::io::stderr().flush().map_err(VaultError::Io)?;

    if !std::io::stdin().is_terminal() {
        // Non-interactive stdin without --yes: refuse rather than hang
        eprintln!();
        return Ok(false);
    }

    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(VaultError::Io)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}

/// Print the human-readable restore report.
pub fn print_restore_report(report: &RestoreReport, silent: bool) {
    if silent {
        return;
    }

    eprintln!(
        "{} restored {}, skipped {} absent, {} malformed line(s), {} failed",
        prefix(),
        report.restored.to_string().green(),
        report.skipped_absent,
        report.malformed,
        if report.failed.is_empty() {
            "0".normal()
        } else {
            report.failed.len().to_string().red()
        },
    );

    for failure in &report.failed {
        eprintln!(
            "    {} {} {}: {}",
            "failed".red(),
            failure.domain.white(),
            failure.key.white(),
            failure.error.truecolor(150, 150, 150),
        );
    }
}

/// Print the records a restore would apply, without applying them.
pub fn print_dry_run(snapshot: &Snapshot, silent: bool) {
    if silent {
        return;
    }

    eprintln!(
        "{} dry run - snapshot {} would write:",
        prefix(),
        snapshot.id.to_string().white().bold()
    );
    for record in &snapshot.records {
        match &record.value {
            Some(value) => eprintln!(
                "    {} {} {} {}",
                record.descriptor.domain.white(),
                record.descriptor.key.white(),
                record.descriptor.value_type.to_string().truecolor(150, 150, 150),
                value.green(),
            ),
            None => eprintln!(
                "    {} {} {}",
                record.descriptor.domain.truecolor(150, 150, 150),
                record.descriptor.key.truecolor(150, 150, 150),
                "(absent at capture, skipped)".truecolor(150, 150, 150),
            ),
        }
    }
    if !snapshot.skipped_lines.is_empty() {
        eprintln!(
            "    {} {} malformed line(s) would be skipped",
            "!".yellow(),
            snapshot.skipped_lines.len()
        );
    }
}
