//! The outcome log — one structured result line per run.
//!
//! Line format (stable contract, read by the status view and any tailer):
//!
//! ```text
//! 2025-11-29 08:00:05 framesync[4711] [quick] - SYNC_RESULT: OK - counts match (remote=120 local=120)
//! ```
//!
//! Records are immutable once written; the log only grows (rotation is an
//! external concern). [`append_at`] is the single write path; the pipeline
//! calls it exactly once per run.

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime};

use framesync_core::paths;
use framesync_core::types::{Counts, RunMode, RunToken};

use crate::error::{io_err, JournalError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const RESULT_MARKER: &str = "SYNC_RESULT: ";

/// One run's recorded outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub timestamp: DateTime<Local>,
    /// Run identity, e.g. `framesync[4711]`.
    pub identity: String,
    pub mode: RunMode,
    pub token: RunToken,
    pub counts: Option<Counts>,
    pub message: String,
}

impl RunOutcome {
    /// Outcome for the current process at the current wall-clock time.
    pub fn now(mode: RunMode, token: RunToken, counts: Option<Counts>, message: String) -> Self {
        Self {
            timestamp: Local::now(),
            identity: format!("framesync[{}]", std::process::id()),
            mode,
            token,
            counts,
            message,
        }
    }

    /// Render the single log line (no trailing newline).
    pub fn to_line(&self) -> String {
        let detail = match self.counts {
            Some(counts) => format!("{} ({counts})", self.message),
            None => self.message.clone(),
        };
        format!(
            "{} {} [{}] - {}{} - {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.identity,
            self.mode,
            RESULT_MARKER,
            self.token,
            detail,
        )
    }
}

/// A line parsed back out of the log. Only fields the stable contract
/// guarantees; the free-text detail is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOutcome {
    pub timestamp: NaiveDateTime,
    pub token: RunToken,
    pub detail: String,
}

/// Parse one outcome line. Lines that do not carry the `SYNC_RESULT` marker
/// (or are otherwise malformed) yield `None` — the log is shared with humans
/// and tailers must skip what they do not understand.
pub fn parse_line(line: &str) -> Option<ParsedOutcome> {
    let timestamp =
        NaiveDateTime::parse_from_str(line.get(..19)?, TIMESTAMP_FORMAT).ok()?;
    let rest = &line[19..];
    let marker_at = rest.find(RESULT_MARKER)?;
    let after = &rest[marker_at + RESULT_MARKER.len()..];
    let (token_text, detail) = match after.find(" - ") {
        Some(sep) => (&after[..sep], after[sep + 3..].to_string()),
        None => (after.trim_end(), String::new()),
    };
    let token = RunToken::from_str(token_text.trim()).ok()?;
    Some(ParsedOutcome {
        timestamp,
        token,
        detail,
    })
}

/// Append one outcome line to `<root>/logs/frame_sync.log`, creating the
/// logs directory on first use.
pub fn append_at(root: &Path, outcome: &RunOutcome) -> Result<(), JournalError> {
    let dir = paths::logs_dir(root);
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    }
    let path = paths::outcome_log_path(root);
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| io_err(&path, e))?;
    writeln!(file, "{}", outcome.to_line()).map_err(|e| io_err(&path, e))?;
    tracing::debug!("recorded outcome: {}", outcome.token);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
