//! Acknowledgement event tags
//!
//! Every dispatched command is answered with exactly one ack carrying one
//! of these tags. Failures always use a tag distinct from the success tag
//! of the same operation.

/// Ack event reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckEvent {
    TapAck,
    TapError,
    MotorEnabled,
    MotorDisabled,
    MotorError,
    ConfigStepsize,
    ConfigError,
    ArmJogged,
    ArmError,
    RunStartAck,
    RunStopAck,
    SeedAck,
    CmdUnknown,
}

impl AckEvent {
    /// Wire tag for this event
    pub fn as_str(self) -> &'static str {
        match self {
            AckEvent::TapAck => "tap.ack",
            AckEvent::TapError => "tap.error",
            AckEvent::MotorEnabled => "motor.enabled",
            AckEvent::MotorDisabled => "motor.disabled",
            AckEvent::MotorError => "motor.error",
            AckEvent::ConfigStepsize => "config.stepsize",
            AckEvent::ConfigError => "config.error",
            AckEvent::ArmJogged => "arm.jogged",
            AckEvent::ArmError => "arm.error",
            AckEvent::RunStartAck => "run_start.ack",
            AckEvent::RunStopAck => "run_stop.ack",
            AckEvent::SeedAck => "seed.ack",
            AckEvent::CmdUnknown => "cmd.unknown",
        }
    }

    /// Returns true if this event reports a failed operation
    pub fn is_error(self) -> bool {
        matches!(
            self,
            AckEvent::TapError | AckEvent::MotorError | AckEvent::ConfigError | AckEvent::ArmError
        )
    }
}
