//! Framesync — picture-frame mirror and viewer-refresh CLI.
//!
//! # Usage
//!
//! ```text
//! framesync run [--detailed]
//! framesync status [--json]
//! framesync source list
//! framesync source switch <id>
//! framesync safe-mode status|clear
//! ```
//!
//! Exit codes: 0 for OK/RESTART outcomes, 1 for an ERROR outcome,
//! 2 for configuration problems or a busy run lock.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{run::RunArgs, safe_mode::SafeModeCommand, source::SourceCommand, status::StatusArgs};

#[derive(Parser, Debug)]
#[command(
    name = "framesync",
    version,
    about = "Keep the picture-frame mirror in sync and refresh the viewer",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile with the cloud store and restart the viewer if needed.
    Run(RunArgs),

    /// Show the last outcomes, counts, and a log tail.
    Status(StatusArgs),

    /// Inspect or switch the configured picture sources.
    Source {
        #[command(subcommand)]
        command: SourceCommand,
    },

    /// Inspect or clear the safe-mode marker.
    SafeMode {
        #[command(subcommand)]
        command: SafeModeCommand,
    },
}

/// `~/.framesync/` for the current user.
pub(crate) fn default_root() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(framesync_core::paths::framesync_root(&home))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Status(args) => args.run().map(|_| ExitCode::SUCCESS),
        Commands::Source { command } => commands::source::run(command).map(|_| ExitCode::SUCCESS),
        Commands::SafeMode { command } => {
            commands::safe_mode::run(command).map(|_| ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("framesync: {err:#}");
            ExitCode::from(2)
        }
    }
}
