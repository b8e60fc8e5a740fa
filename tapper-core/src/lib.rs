//! Board-agnostic core logic for the UNIT1 tapper firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Arm actuation trait
//! - Motor engine (microstep, enable, tap and jog)
//! - Command channel over a byte transport
//! - Heartbeat scheduling and arm position tracking
//! - The orchestrator loop tying them together
//! - Configuration types and parser

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod channel;
pub mod config;
pub mod engine;
pub mod motion;
pub mod orchestrator;
pub mod scheduler;
pub mod traits;

#[cfg(test)]
mod mock;

pub use channel::{CommandChannel, TransportFault};
pub use orchestrator::{InitError, Orchestrator, TickReport};
