//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations. The byte transport traits live
//! in `tapper-hal`.

pub mod actuator;

pub use actuator::{Actuator, ActuatorError, Direction};
