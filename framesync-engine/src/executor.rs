//! Sync execution — bounded retries, transcript capture, verification.
//!
//! Quick mode mirrors and then re-compares counts; detailed mode brackets
//! the transfer with content-equality checks. Tool output is appended to the
//! transcript verbatim and never parsed for control flow.

use std::time::Duration;

use framesync_core::types::{Counts, SourceDescriptor};

use crate::error::EngineError;
use crate::reconcile;
use crate::traits::RemoteStore;

/// Retry bounds for the transfer step.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

/// What the executor did and how it was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub transferred: bool,
    /// Counts observed after the run (quick mode re-count; detailed mode
    /// keeps the pre-transfer counts since verification is content-based).
    pub counts: Counts,
    pub verified: bool,
}

/// Quick mode: mirror with bounded retries, then verify by re-counting.
pub fn quick_sync(
    remote: &impl RemoteStore,
    source: &SourceDescriptor,
    policy: RetryPolicy,
    transcript: &mut String,
) -> Result<SyncResult, EngineError> {
    mirror_with_retries(remote, source, policy, transcript)?;

    // Post-sync verification: counts must now agree.
    let remote_count = remote.count_files(source)?;
    let local_count = reconcile::local_count(&source.local_path)?;
    let counts = Counts {
        remote: remote_count,
        local: local_count,
    };
    if !counts.matched() {
        return Err(EngineError::VerificationMismatch(counts.to_string()));
    }
    Ok(SyncResult {
        transferred: true,
        counts,
        verified: true,
    })
}

/// Detailed mode: check, transfer only on mismatch, re-check.
///
/// Intended for on-demand diagnostics rather than the scheduled path; the
/// caller has already decided to run it, so a clean first check is simply
/// "nothing to do, verified".
pub fn detailed_sync(
    remote: &impl RemoteStore,
    source: &SourceDescriptor,
    counts: Counts,
    policy: RetryPolicy,
    transcript: &mut String,
) -> Result<SyncResult, EngineError> {
    let (in_agreement, output) = remote.check(source, &source.local_path)?;
    push_transcript(transcript, &output);
    if in_agreement {
        return Ok(SyncResult {
            transferred: false,
            counts,
            verified: true,
        });
    }

    mirror_with_retries(remote, source, policy, transcript)?;

    let (verified, output) = remote.check(source, &source.local_path)?;
    push_transcript(transcript, &output);
    if !verified {
        return Err(EngineError::VerificationMismatch(
            "content check still disagrees after transfer".into(),
        ));
    }
    Ok(SyncResult {
        transferred: true,
        counts,
        verified: true,
    })
}

/// The bounded retry loop shared by both modes. First success
/// short-circuits; exhaustion yields `EngineError::Sync`.
fn mirror_with_retries(
    remote: &impl RemoteStore,
    source: &SourceDescriptor,
    policy: RetryPolicy,
    transcript: &mut String,
) -> Result<(), EngineError> {
    let mut last_error = String::new();
    for attempt in 1..=policy.attempts {
        if attempt > 1 {
            std::thread::sleep(policy.delay);
        }
        tracing::info!(
            "transfer attempt {attempt}/{} for source '{}'",
            policy.attempts,
            source.id
        );
        match remote.mirror(source, &source.local_path) {
            Ok(output) => {
                push_transcript(transcript, &output);
                return Ok(());
            }
            Err(err) => {
                last_error = err.to_string();
                push_transcript(transcript, &last_error);
                tracing::warn!("transfer attempt {attempt} failed: {last_error}");
            }
        }
    }
    Err(EngineError::Sync {
        attempts: policy.attempts,
        last_error,
    })
}

fn push_transcript(transcript: &mut String, chunk: &str) {
    if chunk.is_empty() {
        return;
    }
    if !transcript.is_empty() && !transcript.ends_with('\n') {
        transcript.push('\n');
    }
    transcript.push_str(chunk);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
