//! The whole-run pipeline.
//!
//! Order: run lock → disable-flag gate → breaker evaluation → source
//! resolution → count reconciliation → sync → verification → restart
//! coordination → one outcome record. Every failure past the lock is caught
//! here and resolved into a single `ERROR` record; the only ways out without
//! a record are lock contention and journal write failures.

use std::path::Path;
use std::time::Duration;

use framesync_core::types::{Counts, RunMode, RunToken, SourceRegistry};
use framesync_core::Settings;
use framesync_host::{HostError, RunLock};
use framesync_journal::breaker::{self, Gate};
use framesync_journal::outcome::{self, RunOutcome};

use crate::disable::{self, GateDecision};
use crate::error::EngineError;
use crate::executor::{self, RetryPolicy};
use crate::reconcile;
use crate::resolver;
use crate::restart::{self, RestartOutcome};
use crate::traits::{RemoteStore, ViewerService};

/// How long a second invocation waits for the lock before giving up.
const LOCK_GRACE: Duration = Duration::from_secs(5);

/// Inputs the caller has already preflighted (config parsed, tool on PATH).
#[derive(Debug)]
pub struct RunRequest<'a> {
    pub root: &'a Path,
    pub settings: &'a Settings,
    pub registry: &'a SourceRegistry,
    pub mode: RunMode,
    /// Whether a human is attached (decides prompting at the disable gate).
    pub interactive: bool,
}

/// Everything a caller needs to report on the finished run.
#[derive(Debug)]
pub struct RunReport {
    pub token: RunToken,
    pub mode: RunMode,
    pub counts: Option<Counts>,
    pub message: String,
    /// Captured tool output, for operators; never parsed.
    pub transcript: String,
    pub restart: RestartOutcome,
    pub synced: bool,
}

impl RunReport {
    /// Exit code contract: OK/RESTART → 0, ERROR → 1.
    pub fn exit_code(&self) -> i32 {
        match self.token {
            RunToken::Ok | RunToken::Restart => 0,
            RunToken::Error => 1,
        }
    }
}

/// One resolved decision, funneled into the single record site.
struct Decision {
    token: RunToken,
    counts: Option<Counts>,
    message: String,
    restart: RestartOutcome,
    synced: bool,
}

impl Decision {
    fn skipped(message: String) -> Self {
        Self {
            token: RunToken::Ok,
            counts: None,
            message,
            restart: RestartOutcome::NotAttempted,
            synced: false,
        }
    }

    fn failed(err: &EngineError) -> Self {
        Self {
            token: RunToken::Error,
            counts: None,
            message: err.to_string(),
            restart: RestartOutcome::NotAttempted,
            synced: false,
        }
    }
}

/// Execute one run end to end.
///
/// `ask` is the terminal prompt used by the disable gate when
/// `req.interactive` is set.
pub fn execute<R: RemoteStore, S: ViewerService>(
    req: &RunRequest<'_>,
    remote: &R,
    service: &S,
    ask: &mut dyn FnMut(&str) -> std::io::Result<String>,
) -> Result<RunReport, EngineError> {
    let _lock = RunLock::acquire_at(req.root, LOCK_GRACE).map_err(|err| match err {
        HostError::LockBusy { .. } => EngineError::LockBusy,
        other => EngineError::Configuration(format!("run lock: {other}")),
    })?;

    let mut transcript = String::new();

    // Disable-flag gate, before anything else touches the remote.
    if let GateDecision::Skip(message) =
        disable::check_and_maybe_prompt(req.root, req.interactive, ask)?
    {
        let mut breaker = breaker::Breaker::load_at(req.root)?;
        return finalize(req, &mut breaker, Decision::skipped(message), transcript);
    }

    let (mut breaker, gate) = breaker::evaluate_at(req.root)?;

    let decision = match run_policy(req, remote, service, gate, &mut transcript) {
        Ok(decision) => decision,
        Err(err) => {
            tracing::error!("run failed: {err}");
            Decision::failed(&err)
        }
    };

    finalize(req, &mut breaker, decision, transcript)
}

/// The policy proper; every `?` here becomes an `ERROR` record upstream.
fn run_policy<R: RemoteStore, S: ViewerService>(
    req: &RunRequest<'_>,
    remote: &R,
    service: &S,
    gate: Gate,
    transcript: &mut String,
) -> Result<Decision, EngineError> {
    let settings = req.settings;
    let resolution = resolver::resolve_or_default(req.root, req.registry, settings)?;
    let source = resolution.source();
    tracing::info!("syncing source '{}' ({})", source.id, source.remote);

    let rec = reconcile::reconcile(remote, source, settings.min_remote_files)?;
    if !rec.needs_sync && req.mode == RunMode::Quick {
        return Ok(Decision {
            token: RunToken::Ok,
            counts: Some(rec.counts),
            message: "counts match; nothing to do".into(),
            restart: RestartOutcome::NotAttempted,
            synced: false,
        });
    }

    let policy = RetryPolicy {
        attempts: settings.sync_attempts,
        delay: Duration::from_secs(settings.retry_delay_secs),
    };
    let result = match req.mode {
        RunMode::Quick => executor::quick_sync(remote, source, policy, transcript)?,
        RunMode::Detailed => {
            executor::detailed_sync(remote, source, rec.counts, policy, transcript)?
        }
    };

    let restart = restart::maybe_restart(service, result.transferred, result.verified, gate);
    let (token, message) = match &restart {
        RestartOutcome::NotAttempted => (
            RunToken::Ok,
            "content already in agreement; nothing to do".to_string(),
        ),
        RestartOutcome::Suppressed => (
            RunToken::Ok,
            "sync verified; restart suppressed (safe mode)".to_string(),
        ),
        RestartOutcome::Succeeded => (
            RunToken::Restart,
            format!("sync verified; service {} restarted successfully", settings.service),
        ),
        RestartOutcome::Failed(detail) => (
            RunToken::Error,
            format!("sync verified but service restart failed: {detail}"),
        ),
    };

    Ok(Decision {
        token,
        counts: Some(result.counts),
        message,
        restart,
        synced: result.transferred,
    })
}

/// The single record site: one log line, one breaker-ring push, per run.
fn finalize(
    req: &RunRequest<'_>,
    breaker: &mut breaker::Breaker,
    decision: Decision,
    transcript: String,
) -> Result<RunReport, EngineError> {
    let record = RunOutcome::now(
        req.mode,
        decision.token,
        decision.counts,
        decision.message.clone(),
    );
    outcome::append_at(req.root, &record)?;
    breaker.record(req.root, decision.token)?;

    Ok(RunReport {
        token: decision.token,
        mode: req.mode,
        counts: decision.counts,
        message: decision.message,
        transcript,
        restart: decision.restart,
        synced: decision.synced,
    })
}
