//! Outbound messages (device → host)
//!
//! Every message is a single JSON-style line terminated by `\n`, so host
//! tools can split the stream on newlines.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::events::AckEvent;

/// Maximum encoded line length, terminator included
pub const MAX_LINE_LEN: usize = 64;

/// One encoded line ready for the transport
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur while encoding a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Encoded message does not fit in a [`Line`]
    BufferTooSmall,
}

/// Device identity announced in the hello frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity<'a> {
    /// Unit name
    pub name: &'a str,
    /// Firmware version string
    pub firmware: &'a str,
    /// Protocol revision
    pub protocol: u8,
}

impl Identity<'static> {
    /// Identity of the reference UNIT1 build
    pub const UNIT1: Self = Self {
        name: "unit1",
        firmware: "0.0.0",
        protocol: 0,
    };
}

/// Messages from the device to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage<'a> {
    /// Boot identification, sent once
    Hello(Identity<'a>),
    /// Result of a dispatched command
    Ack(AckEvent),
    /// Periodic liveness report
    Heartbeat { uptime_ms: u32 },
    /// A structured frame was discarded
    DecodeError,
}

impl<'a> DeviceMessage<'a> {
    /// Encode this message into a newline-terminated line
    pub fn encode(&self) -> Result<Line, EncodeError> {
        let mut out = String::<MAX_LINE_LEN>::new();

        match self {
            DeviceMessage::Hello(id) => writeln!(
                out,
                "{{\"hello\":\"{}\",\"fw\":\"{}\",\"proto\":{}}}",
                id.name, id.firmware, id.protocol
            ),
            DeviceMessage::Ack(event) => writeln!(out, "{{\"ack\":\"{}\"}}", event.as_str()),
            DeviceMessage::Heartbeat { uptime_ms } => {
                writeln!(out, "{{\"heartbeat\":\"{}\"}}", uptime_ms)
            }
            DeviceMessage::DecodeError => out.write_str("{\"error\":\"decode\"}\n"),
        }
        .map_err(|_| EncodeError::BufferTooSmall)?;

        Ok(out.into_bytes())
    }
}
