//! Stepper driver implementations

pub mod step_dir;

pub use step_dir::{microstep_levels, StepDirActuator, StepDirConfig, StepDirPins};
