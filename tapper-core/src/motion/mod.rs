//! Arm motion bookkeeping

pub mod position;

pub use position::ArmPosition;
