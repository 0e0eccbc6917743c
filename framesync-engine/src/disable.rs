//! The disable-flag gate, consulted before anything else in a run.
//!
//! The flag is the safe-mode marker. Scheduled (non-interactive) runs skip
//! quietly — a cron job must never hard-fail or prompt. An operator at a
//! terminal is offered the override: clearing the marker also resets the
//! breaker so the stale streak cannot immediately re-trip the run it just
//! unblocked.

use std::path::Path;

use framesync_journal::breaker;

use crate::error::EngineError;

/// Decision for the run about to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    /// Skip the whole run; the message becomes the explanatory `OK` record.
    Skip(String),
}

/// Check the marker, prompting when a human is attached.
///
/// `ask` receives the prompt text and returns the raw answer line; the CLI
/// wires it to the terminal, tests script it.
pub fn check_and_maybe_prompt(
    root: &Path,
    interactive: bool,
    ask: &mut dyn FnMut(&str) -> std::io::Result<String>,
) -> Result<GateDecision, EngineError> {
    if !breaker::marker_present_at(root) {
        return Ok(GateDecision::Proceed);
    }

    if !interactive {
        tracing::info!("safe-mode marker present; skipping scheduled run");
        return Ok(GateDecision::Skip(
            "sync disabled by safe-mode marker; scheduled run skipped".into(),
        ));
    }

    let answer = ask("Safe mode is active. Clear the marker and sync now? [y/N] ")
        .map_err(|e| EngineError::Configuration(format!("cannot read answer: {e}")))?;
    if is_yes(&answer) {
        breaker::clear_at(root)?;
        tracing::info!("safe-mode marker cleared by operator");
        return Ok(GateDecision::Proceed);
    }

    Ok(GateDecision::Skip(
        "sync disabled by safe-mode marker; operator declined override".into(),
    ))
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
