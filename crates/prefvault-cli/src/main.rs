//! prefvault CLI - snapshot and restore macOS defaults keys
//!
//! This is the CLI binary that uses the prefvault library for the
//! capture/restore engine.

mod cli;
mod commands;
mod output;
mod table;

use clap::Parser;
use cli::{Cli, Commands};
use prefvault::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse before installing the subscriber so -v can shape the filter;
    // the global default can only be set once.
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli_verbosity(&cli)))
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("prefvault: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Backup(args) => {
            output::print_banner(cli.silent);
            commands::cmd_backup(args, cli.silent)
        }
        Commands::Restore(args) => {
            output::print_banner(cli.silent);
            commands::cmd_restore(args, cli.silent)
        }
        Commands::List(args) => commands::cmd_list(args, cli.silent),
        Commands::Show(args) => commands::cmd_show(args, cli.silent),
    }
}

/// Verbosity requested on the selected subcommand.
fn cli_verbosity(cli: &Cli) -> u8 {
    match &cli.command {
        Commands::Backup(args) => args.verbose,
        Commands::Restore(args) => args.verbose,
        Commands::List(_) | Commands::Show(_) => 0,
    }
}

/// Log filter for the given -v count.
///
/// Without -v the environment (RUST_LOG) decides, defaulting to warn.
fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}
