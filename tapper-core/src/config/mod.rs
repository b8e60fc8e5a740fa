//! Configuration
//!
//! Runtime settings for the orchestrator and the parser for the small
//! TOML file the firmware embeds.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ConfigError, ConfigErrorKind};
pub use types::*;
