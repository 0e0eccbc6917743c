//! Bounded tail reads over the outcome log.
//!
//! The log grows without bound, so everything here reads through a fixed-size
//! ring rather than collecting the whole file.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader};
use std::path::Path;

use framesync_core::paths;
use framesync_core::types::RunToken;

use crate::error::{io_err, JournalError};
use crate::outcome::{parse_line, ParsedOutcome};

/// Last `max_lines` raw lines of the outcome log ("" lines preserved).
/// An absent log yields an empty vec.
pub fn last_lines_at(root: &Path, max_lines: usize) -> Result<Vec<String>, JournalError> {
    let path = paths::outcome_log_path(root);
    if !path.exists() {
        return Ok(Vec::new());
    }
    let file = std::fs::File::open(&path).map_err(|e| io_err(&path, e))?;
    let mut ring: VecDeque<String> = VecDeque::with_capacity(max_lines);
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| io_err(&path, e))?;
        if ring.len() == max_lines {
            ring.pop_front();
        }
        ring.push_back(line);
    }
    Ok(ring.into_iter().collect())
}

/// The `count` most recent result tokens, oldest first.
///
/// Used to bootstrap the breaker ring when the state file is missing, and by
/// the status view. Reads a generous tail so interleaved non-outcome lines
/// cannot starve the window.
pub fn recent_tokens_at(root: &Path, count: usize) -> Result<Vec<RunToken>, JournalError> {
    let lines = last_lines_at(root, count.saturating_mul(8).max(64))?;
    let mut tokens: Vec<RunToken> = lines
        .iter()
        .filter_map(|line| parse_line(line))
        .map(|outcome| outcome.token)
        .collect();
    if tokens.len() > count {
        tokens.drain(..tokens.len() - count);
    }
    Ok(tokens)
}

/// Most recent parsed outcome matching `predicate`, scanning a bounded tail.
pub fn last_matching_at(
    root: &Path,
    max_lines: usize,
    predicate: impl Fn(&ParsedOutcome) -> bool,
) -> Result<Option<ParsedOutcome>, JournalError> {
    let lines = last_lines_at(root, max_lines)?;
    Ok(lines
        .iter()
        .filter_map(|line| parse_line(line))
        .filter(|outcome| predicate(outcome))
        .last())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
