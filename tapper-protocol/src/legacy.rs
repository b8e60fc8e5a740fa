//! Legacy single-byte command tokens
//!
//! Early host tools drive the tapper by sending bare ASCII characters.
//! Each byte is a complete command; nothing is buffered.
//!
//! | Byte      | Command                         |
//! |-----------|---------------------------------|
//! | `t`       | `TapManual`                     |
//! | `e`       | `MotorEnable`                   |
//! | `d`       | `MotorDisable`                  |
//! | `r`       | `ArmJog { up, 9 }`              |
//! | `l`       | `ArmJog { down, 9 }`            |
//! | `1`..`5`  | `SetStepsize { digit }`         |

use crate::command::{Command, LEGACY_JOG_STEPS};

// Wire format values
const TOKEN_TAP: u8 = b't';
const TOKEN_ENABLE: u8 = b'e';
const TOKEN_DISABLE: u8 = b'd';
/// Arm up (away from the target)
const TOKEN_JOG_UP: u8 = b'r';
/// Arm down (toward the target)
const TOKEN_JOG_DOWN: u8 = b'l';

/// Decode one legacy byte
///
/// Every byte maps to some command; unrecognized bytes become
/// [`Command::Unknown`].
pub fn decode(byte: u8) -> Command {
    match byte {
        TOKEN_TAP => Command::TapManual,
        TOKEN_ENABLE => Command::MotorEnable,
        TOKEN_DISABLE => Command::MotorDisable,
        TOKEN_JOG_UP => Command::ArmJog {
            direction_up: true,
            steps: LEGACY_JOG_STEPS,
        },
        TOKEN_JOG_DOWN => Command::ArmJog {
            direction_up: false,
            steps: LEGACY_JOG_STEPS,
        },
        b'1'..=b'5' => Command::SetStepsize {
            microstep: byte - b'0',
        },
        _ => Command::Unknown,
    }
}

/// Encode a command as its legacy token, if it has one
pub fn encode(command: &Command) -> Option<u8> {
    match *command {
        Command::TapManual => Some(TOKEN_TAP),
        Command::MotorEnable => Some(TOKEN_ENABLE),
        Command::MotorDisable => Some(TOKEN_DISABLE),
        Command::ArmJog {
            direction_up: true,
            steps: LEGACY_JOG_STEPS,
        } => Some(TOKEN_JOG_UP),
        Command::ArmJog {
            direction_up: false,
            steps: LEGACY_JOG_STEPS,
        } => Some(TOKEN_JOG_DOWN),
        Command::SetStepsize {
            microstep: microstep @ 1..=5,
        } => Some(b'0' + microstep),
        _ => None,
    }
}
