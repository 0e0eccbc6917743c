//! Framesync core library — domain types, registry persistence, settings, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`CoreError`]
//! - [`registry`] — source registry load / save / lookup
//! - [`pointer`] — active-source pointer state
//! - [`settings`] — tunables with defaults
//! - [`paths`] — filesystem layout under `~/.framesync/`

pub mod error;
pub mod paths;
pub mod pointer;
pub mod registry;
pub mod settings;
pub mod types;

pub use error::CoreError;
pub use settings::Settings;
pub use types::{Counts, RunMode, RunToken, SourceDescriptor, SourceId, SourceRegistry};
