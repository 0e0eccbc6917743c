//! `framesync run` — execute one sync/reconcile cycle.

use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use framesync_core::types::{RunMode, RunToken};
use framesync_core::{registry, settings};
use framesync_engine::pipeline::{execute, RunRequest};
use framesync_engine::EngineError;
use framesync_host::{command, RcloneRemote, SystemdUnit};

/// Arguments for `framesync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Content-equality check instead of the quick count comparison.
    #[arg(long)]
    pub detailed: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<ExitCode> {
        let root = crate::default_root()?;

        // Preflight: config parsed and tool present before any state mutation.
        let settings = settings::load_at(&root).context("failed to load settings")?;
        let registry = registry::load_at(&root)
            .context("failed to load source registry — create config/sources.yaml first")?;
        command::require_tool(&settings.remote_tool)
            .with_context(|| format!("transfer tool '{}' unavailable", settings.remote_tool))?;

        let remote = RcloneRemote::new(
            &settings.remote_tool,
            Duration::from_secs(settings.transfer_timeout_secs),
        );
        let service = SystemdUnit::new(&settings.service, settings.service_user_mode);

        let mode = if self.detailed {
            RunMode::Detailed
        } else {
            RunMode::Quick
        };
        log::info!("starting {mode} run for root {}", root.display());
        let request = RunRequest {
            root: &root,
            settings: &settings,
            registry: &registry,
            mode,
            interactive: std::io::stdin().is_terminal(),
        };

        let mut ask = |prompt: &str| -> std::io::Result<String> {
            print!("{prompt}");
            std::io::stdout().flush()?;
            let mut answer = String::new();
            std::io::stdin().read_line(&mut answer)?;
            Ok(answer)
        };

        let report = match execute(&request, &remote, &service, &mut ask) {
            Ok(report) => report,
            Err(EngineError::LockBusy) => {
                bail!("another sync run is already in progress; try again shortly")
            }
            Err(err) => return Err(err).context("run aborted"),
        };

        if !report.transcript.is_empty() {
            println!("{}", report.transcript);
        }
        if let Some(counts) = report.counts {
            println!("Remote file count: {}", counts.remote);
            println!("Local  file count: {}", counts.local);
        }
        let token = match report.token {
            RunToken::Ok => "OK".green().bold(),
            RunToken::Restart => "RESTART".cyan().bold(),
            RunToken::Error => "ERROR".red().bold(),
        };
        println!("{token} — {}", report.message);

        Ok(ExitCode::from(report.exit_code() as u8))
    }
}
