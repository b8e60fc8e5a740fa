//! Build script for tapper-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates unit1.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Known keys per section, with the accepted integer range (None = string)
const SCHEMA: &[(&str, &[(&str, Option<(i64, i64)>)])] = &[
    ("serial", &[("baudrate", Some((1, u32::MAX as i64)))]),
    ("heartbeat", &[("interval_ms", Some((0, u32::MAX as i64)))]),
    ("dispatch", &[("max_commands_per_tick", Some((0, u16::MAX as i64)))]),
    ("motor", &[("default_microstep", Some((1, 5)))]),
    (
        "identity",
        &[
            ("name", None),
            ("firmware", None),
            ("protocol", Some((0, u8::MAX as i64))),
        ],
    ),
];

/// Capacity of identity strings in the firmware
const MAX_LABEL_LEN: usize = 16;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate unit1.toml configuration at compile time
///
/// Rejects anything the on-device parser would refuse.
fn validate_config() {
    println!("cargo:rerun-if-changed=unit1.toml");

    let config_path = Path::new("unit1.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: unit1.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds unit1.toml as its configuration.            ║\n\
            ║  Please create one in the tapper-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read unit1.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in unit1.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = check_schema(&config);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in unit1.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=unit1.toml validated successfully");
}

/// Check sections, keys, value types and ranges
fn check_schema(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return errors;
    };

    for (section, body) in root {
        let Some(keys) = SCHEMA
            .iter()
            .find(|(name, _)| *name == section.as_str())
            .map(|(_, keys)| *keys)
        else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };

        let Some(body) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };

        for (key, value) in body {
            let Some((_, range)) = keys.iter().find(|(name, _)| *name == key.as_str()) else {
                errors.push(format!("[{}] unknown key '{}'", section, key));
                continue;
            };

            match (range, value) {
                (Some((min, max)), toml::Value::Integer(n)) => {
                    if n < min || n > max {
                        errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
                    }
                }
                (Some(_), _) => errors.push(format!("[{}] {} must be an integer", section, key)),
                (None, toml::Value::String(s)) => {
                    if s.len() > MAX_LABEL_LEN {
                        errors.push(format!(
                            "[{}] {} is longer than {} bytes",
                            section, key, MAX_LABEL_LEN
                        ));
                    }
                    if s.contains('"') || s.contains('\\') {
                        errors.push(format!("[{}] {} must not contain quotes", section, key));
                    }
                }
                (None, _) => errors.push(format!("[{}] {} must be a string", section, key)),
            }
        }
    }

    errors
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
