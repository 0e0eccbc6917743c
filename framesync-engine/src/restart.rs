//! Restart coordination.
//!
//! The viewer is restarted iff a sync actually ran AND verification passed
//! AND the breaker gate allows it. Sync correctness and display refresh are
//! independent failure domains: a failed restart never rolls back or
//! re-runs the sync.

use framesync_journal::breaker::Gate;

use crate::traits::ViewerService;

/// What the coordinator did this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOutcome {
    /// No sync happened, verification failed, or the breaker suppressed it.
    NotAttempted,
    /// The run was eligible but the breaker is tripped.
    Suppressed,
    Succeeded,
    Failed(String),
}

pub fn maybe_restart(
    service: &impl ViewerService,
    sync_performed: bool,
    verified: bool,
    gate: Gate,
) -> RestartOutcome {
    if !sync_performed || !verified {
        return RestartOutcome::NotAttempted;
    }
    if gate == Gate::Suppress {
        tracing::info!("restart suppressed: breaker is tripped");
        return RestartOutcome::Suppressed;
    }
    match service.restart() {
        Ok(()) => RestartOutcome::Succeeded,
        Err(err) => {
            tracing::error!("viewer restart failed: {err}");
            RestartOutcome::Failed(err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
