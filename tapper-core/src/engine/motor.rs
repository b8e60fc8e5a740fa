//! Motor engine implementation
//!
//! The engine is the only owner of [`MotorState`]. Every operation checks
//! its parameters and the enabled flag before touching the actuator, so a
//! rejected request never produces motion and never changes state.

use crate::traits::{Actuator, ActuatorError, Direction};

/// Lowest microstep resolution index
pub const MIN_MICROSTEP: u8 = 1;

/// Highest microstep resolution index
pub const MAX_MICROSTEP: u8 = 5;

/// Microstep resolution index at power-on
pub const DEFAULT_MICROSTEP: u8 = 4;

/// Errors returned by engine operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineError {
    /// Parameter outside its accepted range
    InvalidParameter,
    /// Motion requested while the motor is disabled
    MotorDisabled,
}

/// Motor configuration state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorState {
    /// Microstep resolution index (1-5)
    pub microstep: u8,
    /// Driver energized
    pub enabled: bool,
}

impl Default for MotorState {
    fn default() -> Self {
        Self {
            microstep: DEFAULT_MICROSTEP,
            enabled: false,
        }
    }
}

/// Check a microstep index against the supported range
pub fn validate_microstep(microstep: u8) -> Result<u8, EngineError> {
    if (MIN_MICROSTEP..=MAX_MICROSTEP).contains(&microstep) {
        Ok(microstep)
    } else {
        Err(EngineError::InvalidParameter)
    }
}

/// Motor engine
///
/// Owns the actuator and the motor configuration. There is no timer-driven
/// behavior; state only changes through the operations below.
#[derive(Debug)]
pub struct MotorEngine<A: Actuator> {
    actuator: A,
    state: MotorState,
}

impl<A: Actuator> MotorEngine<A> {
    /// Create an engine with the power-on defaults
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            state: MotorState::default(),
        }
    }

    /// Create an engine with a different starting microstep
    pub fn with_microstep(actuator: A, microstep: u8) -> Result<Self, EngineError> {
        Ok(Self {
            actuator,
            state: MotorState {
                microstep: validate_microstep(microstep)?,
                enabled: false,
            },
        })
    }

    /// Put the hardware in a known-safe idle state
    ///
    /// Leaves the motor disabled and reapplies the current microstep.
    pub fn initialize(&mut self) -> Result<(), ActuatorError> {
        self.actuator.init()?;
        self.state.enabled = false;
        self.actuator.set_enabled(false);
        self.actuator.set_microstep(self.state.microstep);
        Ok(())
    }

    /// Current motor state
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Check if the motor is enabled
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Set the microstep resolution index
    pub fn set_stepsize(&mut self, microstep: u8) -> Result<(), EngineError> {
        let microstep = validate_microstep(microstep)?;
        self.state.microstep = microstep;
        self.actuator.set_microstep(microstep);
        Ok(())
    }

    /// Energize or release the driver
    ///
    /// Always reasserts the enable line, even if the state is unchanged.
    pub fn enable_motor(&mut self, on: bool) -> Result<(), EngineError> {
        self.state.enabled = on;
        self.actuator.set_enabled(on);
        Ok(())
    }

    /// Fire one tap
    pub fn tap_once(&mut self) -> Result<(), EngineError> {
        self.require_enabled()?;
        self.actuator.pulse();
        Ok(())
    }

    /// Move the arm `steps` single steps in one direction
    ///
    /// This is relative motion only; no position is kept here.
    pub fn jog(&mut self, direction: Direction, steps: u8) -> Result<(), EngineError> {
        self.require_enabled()?;
        if steps == 0 {
            return Err(EngineError::InvalidParameter);
        }
        for _ in 0..steps {
            self.actuator.step(direction);
        }
        Ok(())
    }

    /// Access the underlying actuator
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    fn require_enabled(&self) -> Result<(), EngineError> {
        if self.state.enabled {
            Ok(())
        } else {
            Err(EngineError::MotorDisabled)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{ActuatorCall, MockActuator};

    fn enabled_engine() -> MotorEngine<MockActuator> {
        let mut engine = MotorEngine::new(MockActuator::new());
        engine.initialize().unwrap();
        engine.enable_motor(true).unwrap();
        engine
    }

    #[test]
    fn test_defaults() {
        let engine = MotorEngine::new(MockActuator::new());
        assert_eq!(
            engine.state(),
            MotorState {
                microstep: 4,
                enabled: false
            }
        );
    }

    #[test]
    fn test_initialize_is_safe_idle() {
        let mut engine = MotorEngine::new(MockActuator::new());
        engine.initialize().unwrap();
        assert_eq!(
            engine.actuator().calls.as_slice(),
            &[
                ActuatorCall::Init,
                ActuatorCall::Enabled(false),
                ActuatorCall::Microstep(4)
            ]
        );
    }

    #[test]
    fn test_initialize_idempotent_and_disables() {
        let mut engine = enabled_engine();
        engine.set_stepsize(2).unwrap();
        engine.initialize().unwrap();
        engine.initialize().unwrap();
        assert_eq!(
            engine.state(),
            MotorState {
                microstep: 2,
                enabled: false
            }
        );
    }

    #[test]
    fn test_initialize_failure() {
        let mut engine = MotorEngine::new(MockActuator::failing());
        assert_eq!(engine.initialize(), Err(ActuatorError::Unavailable));
    }

    #[test]
    fn test_set_stepsize_range() {
        let mut engine = MotorEngine::new(MockActuator::new());
        for v in 0..=u8::MAX {
            let before = engine.state();
            let result = engine.set_stepsize(v);
            if (1..=5).contains(&v) {
                assert_eq!(result, Ok(()));
                assert_eq!(engine.state().microstep, v);
                assert_eq!(engine.actuator().last_microstep(), Some(v));
            } else {
                assert_eq!(result, Err(EngineError::InvalidParameter));
                assert_eq!(engine.state(), before);
            }
        }
    }

    #[test]
    fn test_with_microstep_validates() {
        assert!(MotorEngine::with_microstep(MockActuator::new(), 0).is_err());
        let engine = MotorEngine::with_microstep(MockActuator::new(), 5).unwrap();
        assert_eq!(engine.state().microstep, 5);
    }

    #[test]
    fn test_enable_reasserts() {
        let mut engine = MotorEngine::new(MockActuator::new());
        engine.enable_motor(true).unwrap();
        engine.enable_motor(true).unwrap();
        assert!(engine.is_enabled());
        assert_eq!(
            engine.actuator().calls.as_slice(),
            &[ActuatorCall::Enabled(true), ActuatorCall::Enabled(true)]
        );
    }

    #[test]
    fn test_disabled_motion_rejected() {
        let mut engine = MotorEngine::new(MockActuator::new());
        assert_eq!(engine.tap_once(), Err(EngineError::MotorDisabled));
        assert_eq!(engine.jog(Direction::Up, 5), Err(EngineError::MotorDisabled));
        assert_eq!(engine.jog(Direction::Up, 0), Err(EngineError::MotorDisabled));
        assert_eq!(engine.actuator().motions(), 0);
        assert_eq!(engine.state(), MotorState::default());
    }

    #[test]
    fn test_tap_once() {
        let mut engine = enabled_engine();
        engine.tap_once().unwrap();
        assert_eq!(engine.actuator().pulses(), 1);
    }

    #[test]
    fn test_jog_zero_steps() {
        let mut engine = enabled_engine();
        assert_eq!(
            engine.jog(Direction::Down, 0),
            Err(EngineError::InvalidParameter)
        );
        assert_eq!(engine.actuator().motions(), 0);
    }

    #[test]
    fn test_jog_exact_step_count() {
        let mut engine = enabled_engine();
        engine.jog(Direction::Up, 9).unwrap();
        engine.jog(Direction::Down, 255).unwrap();
        assert_eq!(engine.actuator().steps(Direction::Up), 9);
        assert_eq!(engine.actuator().steps(Direction::Down), 255);
    }

    #[test]
    fn test_validate_microstep() {
        assert_eq!(validate_microstep(1), Ok(1));
        assert_eq!(validate_microstep(5), Ok(5));
        assert_eq!(validate_microstep(6), Err(EngineError::InvalidParameter));
    }
}
