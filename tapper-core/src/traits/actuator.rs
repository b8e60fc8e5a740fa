//! Arm actuation trait
//!
//! This trait abstracts over the hardware that physically moves the tapper
//! arm (step/dir stepper drivers, PIO step generators, test doubles).
//! Pulse timing is the implementation's business; every call must return
//! within a bounded time.

/// Arm travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Away from the target
    Up,
    /// Toward the target
    Down,
}

impl Direction {
    /// Check if this is the upward direction
    pub fn is_up(self) -> bool {
        self == Direction::Up
    }
}

impl From<bool> for Direction {
    /// `true` is up, matching the wire `direction_up` field
    fn from(up: bool) -> Self {
        if up {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Errors reported by an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Hardware did not respond or could not be driven to idle
    Unavailable,
}

/// Trait for arm actuators
///
/// Implementations own the output lines. Parameter validation happens in
/// the motor engine before any of these are called.
pub trait Actuator {
    /// Drive all outputs to a safe idle state
    ///
    /// Driver disabled, step line inactive. Safe to call more than once.
    fn init(&mut self) -> Result<(), ActuatorError>;

    /// Assert or release the driver enable line
    fn set_enabled(&mut self, enabled: bool);

    /// Apply a microstep resolution index (1-5)
    fn set_microstep(&mut self, microstep: u8);

    /// Fire one tap pulse
    fn pulse(&mut self);

    /// Issue one single step in the given direction
    fn step(&mut self, direction: Direction);
}
