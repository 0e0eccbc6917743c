//! `framesync safe-mode` — operator view and override for the breaker marker.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use framesync_core::paths;
use framesync_journal::breaker::{self, Breaker, BreakerState};

#[derive(Subcommand, Debug)]
pub enum SafeModeCommand {
    /// Show whether safe mode is active and why.
    Status,
    /// Remove the marker and reset the breaker (the interactive override).
    Clear,
}

pub fn run(command: SafeModeCommand) -> Result<()> {
    let root = crate::default_root()?;

    match command {
        SafeModeCommand::Status => {
            let breaker = Breaker::load_at(&root).context("failed to load breaker state")?;
            if breaker::marker_present_at(&root) {
                let marker = paths::marker_path(&root);
                let body = std::fs::read_to_string(&marker).unwrap_or_default();
                println!("Safe mode: {}", "ACTIVE".red().bold());
                if !body.trim().is_empty() {
                    println!("  {}", body.trim());
                }
                println!("  marker: {}", marker.display());
            } else {
                println!("Safe mode: {}", "off".green());
            }
            let state = match breaker.state {
                BreakerState::Normal => "normal",
                BreakerState::Tripped => "tripped",
            };
            let recent: Vec<String> = breaker.recent.iter().map(|t| t.to_string()).collect();
            println!("Breaker: {state} (recent: [{}])", recent.join(", "));
        }
        SafeModeCommand::Clear => {
            if !breaker::marker_present_at(&root) {
                println!("Safe mode is not active; nothing to clear.");
                return Ok(());
            }
            breaker::clear_at(&root).context("failed to clear safe mode")?;
            println!("Safe-mode marker removed; restarts re-enabled.");
        }
    }
    Ok(())
}
