//! `framesync status` — operator view derived from the outcome log.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use serde::Serialize;

use framesync_core::types::RunToken;
use framesync_core::{pointer, registry, settings};
use framesync_host::SystemdUnit;
use framesync_journal::breaker::{marker_present_at, Breaker, BreakerState};
use framesync_journal::outcome::TIMESTAMP_FORMAT;
use framesync_journal::tail;

const TAIL_LINES: usize = 15;

/// Arguments for `framesync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct StatusPayload {
    now: String,
    current_source: String,
    service: String,
    service_state: String,
    safe_mode: bool,
    breaker_state: String,
    last_outcome: Option<OutcomeJson>,
    last_restart: Option<String>,
    last_download: Option<String>,
    log_tail: Vec<String>,
}

#[derive(Serialize)]
struct OutcomeJson {
    at: String,
    token: String,
    detail: String,
}

impl StatusArgs {
    pub fn run(self) -> Result<()> {
        let root = crate::default_root()?;
        let payload = build_payload(&root)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&payload)
                    .context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_human(&payload);
        Ok(())
    }
}

fn build_payload(root: &std::path::Path) -> Result<StatusPayload> {
    let settings = settings::load_at(root).context("failed to load settings")?;

    let current_source = match registry::load_at(root) {
        Ok(reg) => pointer::resolve_at(root, &reg)?
            .map(|s| s.label.clone())
            .or_else(|| reg.first_enabled().map(|s| format!("{} (fallback)", s.label)))
            .unwrap_or_else(|| "--".into()),
        Err(_) => "--".into(),
    };

    let unit = SystemdUnit::new(&settings.service, settings.service_user_mode);
    let breaker = Breaker::load_at(root)?;

    let last_outcome = tail::last_matching_at(root, 200, |_| true)?.map(|o| OutcomeJson {
        at: o.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        token: o.token.to_string(),
        detail: o.detail,
    });
    let last_restart = tail::last_matching_at(root, 500, |o| o.token == RunToken::Restart)?
        .map(|o| o.timestamp.format(TIMESTAMP_FORMAT).to_string());
    let last_download = tail::last_matching_at(root, 500, |o| o.detail.contains("sync verified"))?
        .map(|o| o.timestamp.format(TIMESTAMP_FORMAT).to_string());

    Ok(StatusPayload {
        now: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        current_source,
        service_state: unit.status_text(),
        service: settings.service,
        safe_mode: marker_present_at(root),
        breaker_state: match breaker.state {
            BreakerState::Normal => "normal".into(),
            BreakerState::Tripped => "tripped".into(),
        },
        last_outcome,
        last_restart,
        last_download,
        log_tail: tail::last_lines_at(root, TAIL_LINES)?,
    })
}

fn print_human(payload: &StatusPayload) {
    println!(
        "Framesync v{} | {}",
        env!("CARGO_PKG_VERSION"),
        payload.now
    );
    println!("Current source : {}", payload.current_source);
    println!(
        "Service        : {} ({})",
        payload.service, payload.service_state
    );

    let safe_mode = if payload.safe_mode {
        format!("{} (clear with `framesync safe-mode clear`)", "ACTIVE".red().bold())
    } else {
        "off".green().to_string()
    };
    println!("Safe mode      : {safe_mode} [breaker {}]", payload.breaker_state);

    match &payload.last_outcome {
        Some(outcome) => {
            let token = match outcome.token.as_str() {
                "OK" => outcome.token.green().bold(),
                "RESTART" => outcome.token.cyan().bold(),
                _ => outcome.token.red().bold(),
            };
            println!("Last outcome   : {} {} — {}", outcome.at, token, outcome.detail);
        }
        None => println!("Last outcome   : --"),
    }
    println!(
        "Last restart   : {}",
        payload.last_restart.as_deref().unwrap_or("--")
    );
    println!(
        "Last download  : {}",
        payload.last_download.as_deref().unwrap_or("--")
    );

    if !payload.log_tail.is_empty() {
        println!();
        println!("{}", "Recent log:".bold());
        for line in &payload.log_tail {
            println!("  {line}");
        }
    }
}
