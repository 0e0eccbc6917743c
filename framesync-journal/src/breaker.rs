//! Circuit breaker — the safe-mode gate.
//!
//! State is a small typed file (`state/breaker.json`) holding the breaker
//! state plus a ring of the most recent result tokens, persisted alongside —
//! not instead of — the human-readable log. When the file is missing the
//! ring is re-derived from a bounded tail of the log, so the breaker keeps
//! working against a pre-existing log directory.
//!
//! Trip rule: three consecutive `RESTART` outcomes. The tripped run writes
//! the safe-mode marker; recovery is an interactive override or external
//! marker removal only — never time-based.

use std::path::Path;

use chrono::Local;
use serde::{Deserialize, Serialize};

use framesync_core::paths;
use framesync_core::types::RunToken;

use crate::error::{io_err, JournalError};
use crate::outcome::TIMESTAMP_FORMAT;
use crate::tail;

/// Number of consecutive `RESTART` outcomes that trips the breaker.
pub const STREAK_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BreakerState {
    #[default]
    Normal,
    Tripped,
}

/// What the breaker allows the current run to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Restart permitted after a verified sync.
    Allow,
    /// Restart suppressed for this run; outcome is recorded `OK`.
    Suppress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Breaker {
    pub state: BreakerState,
    /// Most recent tokens, oldest first, at most [`STREAK_LEN`].
    pub recent: Vec<RunToken>,
}

impl Breaker {
    /// Load from `state/breaker.json`; when absent, bootstrap the ring from
    /// the log tail (marker presence decides the state).
    pub fn load_at(root: &Path) -> Result<Self, JournalError> {
        let path = paths::breaker_path(root);
        if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
            return Ok(serde_json::from_str(&contents)?);
        }
        let recent = tail::recent_tokens_at(root, STREAK_LEN)?;
        let state = if marker_present_at(root) {
            BreakerState::Tripped
        } else {
            BreakerState::Normal
        };
        Ok(Self { state, recent })
    }

    /// Save atomically (`.tmp` sibling → rename), like the registry.
    pub fn save_at(&self, root: &Path) -> Result<(), JournalError> {
        let dir = paths::state_dir(root);
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        }
        let path = paths::breaker_path(root);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
        Ok(())
    }

    /// True when the ring holds a full streak of `RESTART` tokens.
    pub fn restart_streak(&self) -> bool {
        self.recent.len() == STREAK_LEN && self.recent.iter().all(|t| *t == RunToken::Restart)
    }

    /// Push a token into the ring (dropping the oldest) and persist.
    pub fn record(&mut self, root: &Path, token: RunToken) -> Result<(), JournalError> {
        if self.recent.len() == STREAK_LEN {
            self.recent.remove(0);
        }
        self.recent.push(token);
        self.save_at(root)
    }

    /// Back to `Normal` with an empty ring (interactive override / external
    /// marker removal).
    pub fn reset(&mut self) {
        self.state = BreakerState::Normal;
        self.recent.clear();
    }
}

/// Evaluate the gate for the run that is about to execute.
///
/// External marker removal while the state file says `Tripped` counts as
/// recovery. A fresh `RESTART` streak trips the breaker here: the marker is
/// written and this run proceeds with its restart suppressed.
pub fn evaluate_at(root: &Path) -> Result<(Breaker, Gate), JournalError> {
    let mut breaker = Breaker::load_at(root)?;

    if breaker.state == BreakerState::Tripped && !marker_present_at(root) {
        tracing::info!("safe-mode marker removed externally; breaker reset");
        breaker.reset();
        breaker.save_at(root)?;
    }

    if breaker.restart_streak() {
        tracing::warn!(
            "{STREAK_LEN} consecutive restarts detected; suppressing restart and entering safe mode"
        );
        breaker.state = BreakerState::Tripped;
        write_marker_at(root, "three consecutive restarts")?;
        breaker.save_at(root)?;
        return Ok((breaker, Gate::Suppress));
    }

    Ok((breaker, Gate::Allow))
}

/// Remove the marker and reset the breaker (the interactive override).
pub fn clear_at(root: &Path) -> Result<(), JournalError> {
    remove_marker_at(root)?;
    let mut breaker = Breaker::load_at(root)?;
    breaker.reset();
    breaker.save_at(root)
}

// ---------------------------------------------------------------------------
// Safe-mode marker
// ---------------------------------------------------------------------------

/// Presence is the whole contract; contents are informational.
pub fn marker_present_at(root: &Path) -> bool {
    paths::marker_path(root).exists()
}

pub fn write_marker_at(root: &Path, reason: &str) -> Result<(), JournalError> {
    let dir = paths::state_dir(root);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    }
    let path = paths::marker_path(root);
    if path.exists() {
        return Ok(());
    }
    let body = format!(
        "{} safe mode: {reason}\n",
        Local::now().format(TIMESTAMP_FORMAT)
    );
    std::fs::write(&path, body).map_err(|e| io_err(&path, e))
}

pub fn remove_marker_at(root: &Path) -> Result<(), JournalError> {
    let path = paths::marker_path(root);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(io_err(&path, err)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
