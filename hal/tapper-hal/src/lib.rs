//! UNIT1 Tapper Hardware Abstraction Layer
//!
//! This crate defines the transport traits that chip-specific code
//! implements so the protocol core can run on any board (or on the host
//! under test) without touching a real serial peripheral.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (tapper-firmware, tests)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tapper-core (CommandChannel)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  tapper-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartRx`], [`uart::UartTx`] - Non-blocking serial I/O
//! - [`uart::ByteChannel`] - A serial port that can be opened at a given rate

#![no_std]
#![deny(unsafe_code)]

pub mod uart;

// Re-export key traits at crate root for convenience
pub use uart::{ByteChannel, UartConfig, UartRx, UartTx};
