//! Configuration type definitions
//!
//! These types hold every tunable of the orchestrator. Defaults reproduce
//! the reference UNIT1 build: 115200 baud, heartbeat every second,
//! unbounded command draining, microstep 4.

use heapless::String;
use tapper_hal::UartConfig;
use tapper_protocol::Identity;

use crate::engine::DEFAULT_MICROSTEP;
use crate::scheduler::DEFAULT_HEARTBEAT_INTERVAL_MS;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of identity strings
pub const MAX_LABEL_LEN: usize = 16;

/// Reference baud rate
pub const DEFAULT_BAUDRATE: u32 = 115200;

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: DEFAULT_BAUDRATE,
        }
    }
}

/// Heartbeat settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeartbeatConfig {
    /// Period in ms; 0 disables heartbeats
    pub interval_ms: u32,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_HEARTBEAT_INTERVAL_MS,
        }
    }
}

/// Command dispatch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DispatchConfig {
    /// Commands handled per loop pass; 0 drains until the input is empty
    pub max_commands_per_tick: u16,
}

impl DispatchConfig {
    /// Per-pass command limit, if any
    pub fn limit(&self) -> Option<usize> {
        match self.max_commands_per_tick {
            0 => None,
            n => Some(n as usize),
        }
    }
}

/// Motor settings applied at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MotorConfig {
    /// Microstep resolution index at boot (1-5)
    pub default_microstep: u8,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            default_microstep: DEFAULT_MICROSTEP,
        }
    }
}

/// Identity announced in the hello frame
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IdentityConfig {
    /// Unit name
    pub name: String<MAX_LABEL_LEN>,
    /// Firmware version
    pub firmware: String<MAX_LABEL_LEN>,
    /// Protocol revision
    pub protocol: u8,
}

impl IdentityConfig {
    /// Borrow as a protocol identity
    pub fn as_identity(&self) -> Identity<'_> {
        Identity {
            name: self.name.as_str(),
            firmware: self.firmware.as_str(),
            protocol: self.protocol,
        }
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        let unit1 = Identity::UNIT1;
        let mut name = String::new();
        let mut firmware = String::new();
        // Both literals are well under MAX_LABEL_LEN
        let _ = name.push_str(unit1.name);
        let _ = firmware.push_str(unit1.firmware);
        Self {
            name,
            firmware,
            protocol: unit1.protocol,
        }
    }
}

/// Complete tapper configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TapperConfig {
    pub serial: SerialConfig,
    pub heartbeat: HeartbeatConfig,
    pub dispatch: DispatchConfig,
    pub motor: MotorConfig,
    pub identity: IdentityConfig,
}

impl TapperConfig {
    /// UART line settings (8N1 at the configured rate)
    pub fn uart_config(&self) -> UartConfig {
        UartConfig::with_baudrate(self.serial.baudrate)
    }
}
