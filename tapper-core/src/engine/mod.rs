//! Motor engine
//!
//! Translates validated motion requests into actuator calls and owns the
//! motor configuration state.

pub mod motor;

pub use motor::{
    validate_microstep, EngineError, MotorEngine, MotorState, DEFAULT_MICROSTEP, MAX_MICROSTEP,
    MIN_MICROSTEP,
};
