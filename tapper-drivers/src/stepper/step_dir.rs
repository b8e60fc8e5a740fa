//! Step/dir stepper actuator
//!
//! Drives A4988/DRV8825-style carrier boards: one rising edge on STEP moves
//! one (micro)step in the direction latched on DIR. Microstep resolution is
//! selected with the MS1..MS3 pins.
//!
//! # Microstep Table
//!
//! | Index | MS1 | MS2 | MS3 | Resolution |
//! |-------|-----|-----|-----|------------|
//! | 1     | L   | L   | L   | full       |
//! | 2     | H   | L   | L   | 1/2        |
//! | 3     | L   | H   | L   | 1/4        |
//! | 4     | H   | H   | L   | 1/8        |
//! | 5     | H   | H   | H   | 1/16       |

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use tapper_core::traits::{Actuator, ActuatorError, Direction};

/// MS1..MS3 levels for each microstep index, starting at index 1
const MICROSTEP_PINS: [[bool; 3]; 5] = [
    [false, false, false],
    [true, false, false],
    [false, true, false],
    [true, true, false],
    [true, true, true],
];

/// Pin levels for a microstep index, if supported
pub fn microstep_levels(index: u8) -> Option<[bool; 3]> {
    let slot = usize::from(index).checked_sub(1)?;
    MICROSTEP_PINS.get(slot).copied()
}

/// Step/dir driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepDirConfig {
    /// Enable pin is active-low
    pub enable_inverted: bool,
    /// STEP high and low time in microseconds
    pub pulse_width_us: u32,
    /// Steps in one tap stroke (down, then back up)
    pub tap_steps: u8,
}

impl Default for StepDirConfig {
    fn default() -> Self {
        Self {
            enable_inverted: true,
            pulse_width_us: 2,
            tap_steps: 8,
        }
    }
}

/// Output pins of a step/dir carrier board
pub struct StepDirPins<P> {
    pub step: P,
    pub dir: P,
    pub enable: P,
    pub ms1: P,
    pub ms2: P,
    pub ms3: P,
}

/// Step/dir actuator
///
/// Pin writes after [`Actuator::init`] are best-effort; GPIO writes on the
/// supported boards cannot fail.
pub struct StepDirActuator<P, D> {
    pins: StepDirPins<P>,
    delay: D,
    config: StepDirConfig,
}

impl<P: OutputPin, D: DelayNs> StepDirActuator<P, D> {
    /// Create a new actuator; call [`Actuator::init`] before use
    pub fn new(pins: StepDirPins<P>, delay: D, config: StepDirConfig) -> Self {
        Self {
            pins,
            delay,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &StepDirConfig {
        &self.config
    }

    /// Level for the enable pin
    fn enable_level(&self, enabled: bool) -> PinState {
        PinState::from(enabled != self.config.enable_inverted)
    }

    fn step_pulse(&mut self) {
        let _ = self.pins.step.set_high();
        self.delay.delay_us(self.config.pulse_width_us);
        let _ = self.pins.step.set_low();
        self.delay.delay_us(self.config.pulse_width_us);
    }
}

impl<P: OutputPin, D: DelayNs> Actuator for StepDirActuator<P, D> {
    fn init(&mut self) -> Result<(), ActuatorError> {
        let idle = self.enable_level(false);
        self.pins
            .enable
            .set_state(idle)
            .map_err(|_| ActuatorError::Unavailable)?;
        self.pins
            .step
            .set_low()
            .map_err(|_| ActuatorError::Unavailable)?;
        Ok(())
    }

    fn set_enabled(&mut self, enabled: bool) {
        let level = self.enable_level(enabled);
        let _ = self.pins.enable.set_state(level);
    }

    fn set_microstep(&mut self, microstep: u8) {
        // The engine only passes validated indices
        let Some([ms1, ms2, ms3]) = microstep_levels(microstep) else {
            return;
        };
        let _ = self.pins.ms1.set_state(PinState::from(ms1));
        let _ = self.pins.ms2.set_state(PinState::from(ms2));
        let _ = self.pins.ms3.set_state(PinState::from(ms3));
    }

    fn pulse(&mut self) {
        for _ in 0..self.config.tap_steps {
            self.step(Direction::Down);
        }
        for _ in 0..self.config.tap_steps {
            self.step(Direction::Up);
        }
    }

    fn step(&mut self, direction: Direction) {
        let _ = self.pins.dir.set_state(PinState::from(direction.is_up()));
        self.step_pulse();
    }
}
