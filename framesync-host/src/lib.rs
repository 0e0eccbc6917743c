//! # framesync-host
//!
//! Seams to the appliance host: the `rclone` remote client, the `systemctl`
//! service manager, the run lock, and the timeout-bounded subprocess runner
//! they share. Everything here blocks; policy lives in framesync-engine.

pub mod command;
pub mod error;
pub mod lock;
pub mod remote;
pub mod service;

pub use command::CommandOutput;
pub use error::HostError;
pub use lock::RunLock;
pub use remote::RcloneRemote;
pub use service::SystemdUnit;
