//! Minimal TOML parser for tapper configuration
//!
//! Handles only the subset the configuration file uses. It does NOT
//! support the full TOML spec.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs (string, unsigned integer)
//! - Comments (`# ...`), whole-line or trailing
//!
//! Missing keys keep their defaults. Unknown sections and keys are
//! rejected.

use heapless::String;

use super::types::{TapperConfig, MAX_LABEL_LEN};
use crate::engine::validate_microstep;

/// What went wrong on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigErrorKind {
    /// Unknown or malformed section header
    InvalidSection,
    /// Key not valid in its section
    UnknownKey,
    /// Line is not `key = value`, or the value has the wrong type
    InvalidValue,
    /// Number outside the accepted range
    OutOfRange,
    /// String longer than the label capacity
    TooLong,
}

/// Parse error with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigError {
    pub line: usize,
    pub kind: ConfigErrorKind,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Serial,
    Heartbeat,
    Dispatch,
    Motor,
    Identity,
}

/// Parse TOML configuration into a [`TapperConfig`]
pub fn parse_config(input: &str) -> Result<TapperConfig, ConfigError> {
    let mut config = TapperConfig::default();
    let mut section = Section::Root;

    for (index, line) in input.lines().enumerate() {
        let at = |kind| ConfigError {
            line: index + 1,
            kind,
        };
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(at(ConfigErrorKind::InvalidSection))?;
            section = parse_section_header(name.trim()).ok_or(at(ConfigErrorKind::InvalidSection))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(at(ConfigErrorKind::InvalidValue))?;
        apply(&mut config, section, key, value).map_err(at)?;
    }

    Ok(config)
}

fn parse_section_header(name: &str) -> Option<Section> {
    match name {
        "serial" => Some(Section::Serial),
        "heartbeat" => Some(Section::Heartbeat),
        "dispatch" => Some(Section::Dispatch),
        "motor" => Some(Section::Motor),
        "identity" => Some(Section::Identity),
        _ => None,
    }
}

fn apply(
    config: &mut TapperConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigErrorKind> {
    match (section, key) {
        (Section::Serial, "baudrate") => {
            let baudrate = parse_int(value)?;
            if baudrate == 0 {
                return Err(ConfigErrorKind::OutOfRange);
            }
            config.serial.baudrate = baudrate;
        }
        (Section::Heartbeat, "interval_ms") => config.heartbeat.interval_ms = parse_int(value)?,
        (Section::Dispatch, "max_commands_per_tick") => {
            config.dispatch.max_commands_per_tick = parse_int(value)?
        }
        (Section::Motor, "default_microstep") => {
            config.motor.default_microstep =
                validate_microstep(parse_int(value)?).map_err(|_| ConfigErrorKind::OutOfRange)?
        }
        (Section::Identity, "name") => config.identity.name = parse_label(value)?,
        (Section::Identity, "firmware") => config.identity.firmware = parse_label(value)?,
        (Section::Identity, "protocol") => config.identity.protocol = parse_int(value)?,
        _ => return Err(ConfigErrorKind::UnknownKey),
    }
    Ok(())
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Split `key = value`
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() || value.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

/// Parse an unsigned integer, separating type errors from range errors
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, ConfigErrorKind> {
    // TOML allows `115_200`
    let mut digits = String::<24>::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ConfigErrorKind::OutOfRange)?;
    }
    let wide: u64 = digits.parse().map_err(|_| ConfigErrorKind::InvalidValue)?;
    T::try_from(wide).map_err(|_| ConfigErrorKind::OutOfRange)
}

/// Parse a quoted string into a label
fn parse_label(value: &str) -> Result<String<MAX_LABEL_LEN>, ConfigErrorKind> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigErrorKind::InvalidValue)?;
    if inner.contains('"') || inner.contains('\\') {
        return Err(ConfigErrorKind::InvalidValue);
    }
    let mut label = String::new();
    label
        .push_str(inner)
        .map_err(|_| ConfigErrorKind::TooLong)?;
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
# UNIT1 reference configuration

[serial]
baudrate = 115_200

[heartbeat]
interval_ms = 500   # twice a second

[dispatch]
max_commands_per_tick = 4

[motor]
default_microstep = 2

[identity]
name = "unit1-b"
firmware = "0.1.0"
protocol = 1
"#;

    #[test]
    fn test_full_file() {
        let config = parse_config(FULL).unwrap();
        assert_eq!(config.serial.baudrate, 115200);
        assert_eq!(config.heartbeat.interval_ms, 500);
        assert_eq!(config.dispatch.limit(), Some(4));
        assert_eq!(config.motor.default_microstep, 2);
        assert_eq!(config.identity.name.as_str(), "unit1-b");
        assert_eq!(config.identity.firmware.as_str(), "0.1.0");
        assert_eq!(config.identity.protocol, 1);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(parse_config(""), Ok(TapperConfig::default()));
        assert_eq!(parse_config("# nothing\n\n"), Ok(TapperConfig::default()));
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_config("[heartbeat]\ninterval_ms = 0\n").unwrap();
        assert_eq!(config.heartbeat.interval_ms, 0);
        assert_eq!(config.serial.baudrate, 115200);
        assert_eq!(config.motor.default_microstep, 4);
    }

    #[test]
    fn test_unknown_section() {
        assert_eq!(
            parse_config("[serial]\nbaudrate = 9600\n[stepper]\n"),
            Err(ConfigError {
                line: 3,
                kind: ConfigErrorKind::InvalidSection
            })
        );
        assert_eq!(
            parse_config("[serial\n").unwrap_err().kind,
            ConfigErrorKind::InvalidSection
        );
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(
            parse_config("[motor]\nmicrostep = 2\n"),
            Err(ConfigError {
                line: 2,
                kind: ConfigErrorKind::UnknownKey
            })
        );
        // Keys outside any section are not accepted
        assert_eq!(
            parse_config("baudrate = 9600\n").unwrap_err().kind,
            ConfigErrorKind::UnknownKey
        );
    }

    #[test]
    fn test_invalid_values() {
        let kind = |input| parse_config(input).unwrap_err().kind;
        assert_eq!(kind("[serial]\nbaudrate = fast\n"), ConfigErrorKind::InvalidValue);
        assert_eq!(kind("[serial]\nbaudrate = -1\n"), ConfigErrorKind::InvalidValue);
        assert_eq!(kind("[serial]\nbaudrate =\n"), ConfigErrorKind::InvalidValue);
        assert_eq!(kind("[identity]\nname = unit1\n"), ConfigErrorKind::InvalidValue);
    }

    #[test]
    fn test_out_of_range() {
        let kind = |input| parse_config(input).unwrap_err().kind;
        assert_eq!(kind("[motor]\ndefault_microstep = 0\n"), ConfigErrorKind::OutOfRange);
        assert_eq!(kind("[motor]\ndefault_microstep = 6\n"), ConfigErrorKind::OutOfRange);
        assert_eq!(kind("[motor]\ndefault_microstep = 300\n"), ConfigErrorKind::OutOfRange);
        assert_eq!(kind("[serial]\nbaudrate = 0\n"), ConfigErrorKind::OutOfRange);
        assert_eq!(
            kind("[heartbeat]\ninterval_ms = 4294967296\n"),
            ConfigErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_label_too_long() {
        assert_eq!(
            parse_config("[identity]\nname = \"a-name-longer-than-sixteen\"\n")
                .unwrap_err()
                .kind,
            ConfigErrorKind::TooLong
        );
    }

    #[test]
    fn test_hash_inside_string() {
        let config = parse_config("[identity]\nname = \"unit#1\" # comment\n").unwrap();
        assert_eq!(config.identity.name.as_str(), "unit#1");
    }
}
