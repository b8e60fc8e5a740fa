//! Host commands
//!
//! A [`Command`] is one fully decoded host request. Both inbound grammars
//! produce the same type, so dispatch does not care how a command arrived.

use core::fmt::Write;

use heapless::String;

use crate::decoder::DecodeError;
use crate::fields::Fields;
use crate::messages::{EncodeError, Line, MAX_LINE_LEN};

/// Steps moved by the legacy `r` / `l` jog tokens
pub const LEGACY_JOG_STEPS: u8 = 9;

// Structured frame `type` names: the spelling this firmware sends, then
// the variant name, which is also accepted on input
const TYPE_UNKNOWN: [&str; 2] = ["unknown", "Unknown"];
const TYPE_RUN_START: [&str; 2] = ["run_start", "RunStart"];
const TYPE_RUN_STOP: [&str; 2] = ["run_stop", "RunStop"];
const TYPE_TAP_MANUAL: [&str; 2] = ["tap_manual", "TapManual"];
const TYPE_MOTOR_ENABLE: [&str; 2] = ["motor_enable", "MotorEnable"];
const TYPE_MOTOR_DISABLE: [&str; 2] = ["motor_disable", "MotorDisable"];
const TYPE_ARM_JOG: [&str; 2] = ["arm_jog", "ArmJog"];
const TYPE_SET_STEPSIZE: [&str; 2] = ["set_stepsize", "SetStepsize"];
const TYPE_SEED: [&str; 2] = ["seed", "Seed"];

fn names(kind: &[u8], spellings: [&str; 2]) -> bool {
    spellings.iter().any(|name| name.as_bytes() == kind)
}

/// A decoded host request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Bytes could not be classified
    Unknown,
    /// Start a run session (reserved)
    RunStart,
    /// Stop a run session (reserved)
    RunStop,
    /// Fire one tap immediately
    TapManual,
    /// Energize the motor driver
    MotorEnable,
    /// Release the motor driver
    MotorDisable,
    /// Move the arm a fixed number of steps
    ArmJog { direction_up: bool, steps: u8 },
    /// Change microstep resolution
    ///
    /// Carried unchecked; the motor engine owns the `1..=5` range check.
    SetStepsize { microstep: u8 },
    /// Period/seed payload (reserved)
    Seed { value: u32 },
}

impl Command {
    /// Name used for this variant in the structured `type` field
    pub fn type_name(&self) -> &'static str {
        let [name, _] = match self {
            Command::Unknown => TYPE_UNKNOWN,
            Command::RunStart => TYPE_RUN_START,
            Command::RunStop => TYPE_RUN_STOP,
            Command::TapManual => TYPE_TAP_MANUAL,
            Command::MotorEnable => TYPE_MOTOR_ENABLE,
            Command::MotorDisable => TYPE_MOTOR_DISABLE,
            Command::ArmJog { .. } => TYPE_ARM_JOG,
            Command::SetStepsize { .. } => TYPE_SET_STEPSIZE,
            Command::Seed { .. } => TYPE_SEED,
        };
        name
    }

    /// Build a command from the fields of a structured frame
    ///
    /// `type` may be the snake_case name or the variant name
    /// (`arm_jog` or `ArmJog`). A `type` that names no known variant
    /// yields [`Command::Unknown`]; a missing `type`, or a missing payload
    /// field for a known type, is an error.
    pub fn from_fields(fields: &Fields<'_>) -> Result<Self, DecodeError> {
        let kind = fields.kind.ok_or(DecodeError::MissingField)?;

        let command = match kind {
            k if names(k, TYPE_TAP_MANUAL) => Command::TapManual,
            k if names(k, TYPE_MOTOR_ENABLE) => Command::MotorEnable,
            k if names(k, TYPE_MOTOR_DISABLE) => Command::MotorDisable,
            k if names(k, TYPE_RUN_START) => Command::RunStart,
            k if names(k, TYPE_RUN_STOP) => Command::RunStop,
            k if names(k, TYPE_ARM_JOG) => Command::ArmJog {
                direction_up: fields.direction_up.ok_or(DecodeError::MissingField)?,
                steps: fields.steps.ok_or(DecodeError::MissingField)?,
            },
            k if names(k, TYPE_SET_STEPSIZE) => Command::SetStepsize {
                microstep: fields.microstep.ok_or(DecodeError::MissingField)?,
            },
            k if names(k, TYPE_SEED) => Command::Seed {
                value: fields
                    .seed
                    .or(fields.period_ms)
                    .ok_or(DecodeError::MissingField)?,
            },
            _ => Command::Unknown,
        };

        Ok(command)
    }

    /// Encode this command as a newline-terminated structured frame
    pub fn to_frame(&self) -> Result<Line, EncodeError> {
        let mut out = String::<MAX_LINE_LEN>::new();

        write!(out, "{{\"type\":\"{}\"", self.type_name()).map_err(|_| EncodeError::BufferTooSmall)?;
        match self {
            Command::ArmJog {
                direction_up,
                steps,
            } => write!(out, ",\"direction_up\":{},\"steps\":{}", direction_up, steps),
            Command::SetStepsize { microstep } => write!(out, ",\"microstep\":{}", microstep),
            Command::Seed { value } => write!(out, ",\"seed\":{}", value),
            _ => Ok(()),
        }
        .map_err(|_| EncodeError::BufferTooSmall)?;
        out.push_str("}\n").map_err(|_| EncodeError::BufferTooSmall)?;

        Ok(out.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::parse_fields;

    #[test]
    fn test_arm_jog_frame() {
        let cmd = Command::ArmJog {
            direction_up: false,
            steps: 12,
        };
        let frame = cmd.to_frame().unwrap();
        assert_eq!(
            frame.as_slice(),
            b"{\"type\":\"arm_jog\",\"direction_up\":false,\"steps\":12}\n"
        );
    }

    #[test]
    fn test_seed_frame() {
        let frame = Command::Seed { value: 4_294_967_295 }.to_frame().unwrap();
        assert_eq!(frame.as_slice(), b"{\"type\":\"seed\",\"seed\":4294967295}\n");
    }

    #[test]
    fn test_payloadless_frame() {
        let frame = Command::TapManual.to_frame().unwrap();
        assert_eq!(frame.as_slice(), b"{\"type\":\"tap_manual\"}\n");
    }

    #[test]
    fn test_missing_type() {
        let fields = parse_fields(b"{\"steps\":3}").unwrap();
        assert_eq!(Command::from_fields(&fields), Err(DecodeError::MissingField));
    }

    #[test]
    fn test_unknown_type_is_unknown_command() {
        let fields = parse_fields(b"{\"type\":\"dance\"}").unwrap();
        assert_eq!(Command::from_fields(&fields), Ok(Command::Unknown));
    }

    #[test]
    fn test_variant_names_accepted() {
        let decode = |frame: &[u8]| Command::from_fields(&parse_fields(frame).unwrap());
        assert_eq!(decode(b"{\"type\":\"MotorEnable\"}"), Ok(Command::MotorEnable));
        assert_eq!(decode(b"{\"type\":\"TapManual\"}"), Ok(Command::TapManual));
        assert_eq!(
            decode(b"{\"type\":\"ArmJog\",\"direction_up\":true,\"steps\":5}"),
            Ok(Command::ArmJog {
                direction_up: true,
                steps: 5
            })
        );
        assert_eq!(
            decode(b"{\"type\":\"SetStepsize\",\"microstep\":3}"),
            Ok(Command::SetStepsize { microstep: 3 })
        );
        assert_eq!(decode(b"{\"type\":\"Seed\",\"seed\":9}"), Ok(Command::Seed { value: 9 }));
        // Matching is exact
        assert_eq!(decode(b"{\"type\":\"motorEnable\"}"), Ok(Command::Unknown));
        assert_eq!(decode(b"{\"type\":\"ArmJog\"}"), Err(DecodeError::MissingField));
    }

    #[test]
    fn test_type_names_round_trip() {
        let commands = [
            Command::Unknown,
            Command::RunStart,
            Command::RunStop,
            Command::TapManual,
            Command::MotorEnable,
            Command::MotorDisable,
        ];
        for command in commands {
            let frame = command.to_frame().unwrap();
            let body = frame.strip_suffix(b"\n").unwrap();
            assert_eq!(Command::from_fields(&parse_fields(body).unwrap()), Ok(command));
        }
    }

    #[test]
    fn test_arm_jog_requires_payload() {
        let fields = parse_fields(b"{\"type\":\"arm_jog\",\"steps\":3}").unwrap();
        assert_eq!(Command::from_fields(&fields), Err(DecodeError::MissingField));
    }

    #[test]
    fn test_seed_falls_back_to_period() {
        let fields = parse_fields(b"{\"type\":\"seed\",\"period_ms\":250}").unwrap();
        assert_eq!(Command::from_fields(&fields), Ok(Command::Seed { value: 250 }));

        let fields = parse_fields(b"{\"type\":\"seed\",\"period_ms\":250,\"seed\":7}").unwrap();
        assert_eq!(Command::from_fields(&fields), Ok(Command::Seed { value: 7 }));
    }
}
