//! # framesync-engine
//!
//! The sync/reconciliation orchestrator.
//!
//! Call [`pipeline::execute`] to run the whole policy once: disable-flag
//! gate, breaker evaluation, source resolution, count reconciliation,
//! bounded-retry sync, verification, restart coordination, and the single
//! outcome record. The seams to the host (`RemoteStore`, `ViewerService`)
//! are traits so tests drive the pipeline with fakes.

pub mod disable;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod reconcile;
pub mod resolver;
pub mod restart;
pub mod traits;

pub use error::EngineError;
pub use pipeline::{execute, RunReport};
pub use restart::RestartOutcome;
pub use traits::{RemoteStore, ViewerService};
