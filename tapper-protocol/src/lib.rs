//! UNIT1 Host Serial Protocol
//!
//! This crate defines the byte-level protocol between a host PC and the
//! tapper firmware. It is pure codec logic: no I/O, no allocation.
//!
//! # Protocol Overview
//!
//! Inbound (host → device) uses two grammars, selected by the first byte
//! of each message:
//!
//! ```text
//! legacy:      t | e | d | r | l | 1..5            (one byte, no terminator)
//! structured:  {"type":"arm_jog","direction_up":true,"steps":9}\n
//! ```
//!
//! Outbound (device → host) is always a single JSON-style line:
//!
//! ```text
//! {"hello":"unit1","fw":"0.0.0","proto":0}
//! {"ack":"tap.ack"}
//! {"heartbeat":"1000"}
//! {"error":"decode"}
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod decoder;
pub mod events;
pub mod fields;
pub mod legacy;
pub mod messages;

pub use command::{Command, LEGACY_JOG_STEPS};
pub use decoder::{DecodeError, Decoder, FRAME_END, FRAME_START, MAX_FRAME_LEN};
pub use events::AckEvent;
pub use messages::{DeviceMessage, EncodeError, Identity, Line, MAX_LINE_LEN};
