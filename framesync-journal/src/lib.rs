//! # framesync-journal
//!
//! The append-only outcome log and the state derived from it.
//!
//! [`outcome`] owns the one-line-per-run `SYNC_RESULT` contract, [`tail`]
//! reads a bounded tail of the log, and [`breaker`] keeps the circuit-breaker
//! state (a typed `{state, recent-tokens}` file persisted alongside the log)
//! plus the safe-mode marker.

pub mod breaker;
pub mod error;
pub mod outcome;
pub mod tail;

pub use breaker::{Breaker, BreakerState};
pub use error::JournalError;
pub use outcome::RunOutcome;
