//! Relative arm position
//!
//! The motor engine issues steps without remembering where the arm is.
//! This counter sits beside it and accumulates every completed jog so the
//! firmware can report net travel. It is informational: nothing is ever
//! refused because of it, and it is not a homed or absolute position.

use crate::traits::Direction;

/// Net arm travel in steps since the last reset (up is positive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ArmPosition {
    steps: i32,
}

impl ArmPosition {
    /// Create a counter at zero
    pub const fn new() -> Self {
        Self { steps: 0 }
    }

    /// Record a completed jog
    pub fn record_jog(&mut self, direction: Direction, steps: u8) {
        let delta = steps as i32;
        self.steps = match direction {
            Direction::Up => self.steps.wrapping_add(delta),
            Direction::Down => self.steps.wrapping_sub(delta),
        };
    }

    /// Net steps since the last reset
    pub fn steps(&self) -> i32 {
        self.steps
    }

    /// Zero the counter
    pub fn reset(&mut self) {
        self.steps = 0;
    }
}
