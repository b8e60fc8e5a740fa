//! Housekeeping scheduler
//!
//! Periodic work that runs after command servicing on each loop pass.

pub mod heartbeat;

pub use heartbeat::{HeartbeatScheduler, DEFAULT_HEARTBEAT_INTERVAL_MS};
