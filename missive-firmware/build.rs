//! Build script for missive-firmware
//!
//! - Passes the cortex-m-rt and defmt linker scripts (memory.x comes from
//!   embassy-stm32's `memory-x` feature)
//! - Validates device.toml at compile time

use std::path::Path;

fn main() {
    setup_linker();
    validate_config();
}

fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if std::env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml at build time.                  ║\n\
            ║  Please create one in the missive-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = std::fs::read_to_string(config_path).unwrap_or_else(|e| {
        panic!("Failed to read device.toml: {}", e);
    });

    let config: toml::Value = match toml::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║  {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e.to_string().replace('\n', "\n║  ")
            );
        }
    };

    let mut errors = Vec::new();
    check_sections(&config, &mut errors);
    check_tick(&config, &mut errors);
    check_positive(&config, "input", "stable_polls", &mut errors);
    check_positive(&config, "serial", "baudrate", &mut errors);
    check_positive(&config, "runtime", "liveness_ms", &mut errors);

    if let Some(value) = lookup(&config, "ingest", "backspace") {
        match value.as_str() {
            Some("wrap") | Some("clamp") => {}
            _ => errors.push("[ingest] backspace must be 'wrap' or 'clamp'".to_string()),
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid device.toml                                      ║\n\
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
}

const SECTIONS: [&str; 5] = ["tick", "ingest", "input", "serial", "runtime"];

/// The firmware parser rejects unknown sections, so the build does too
fn check_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        return;
    };
    for (name, value) in table {
        if !SECTIONS.contains(&name.as_str()) {
            errors.push(format!("Unknown section [{}]", name));
        } else if !value.is_table() {
            errors.push(format!("[{}] must be a table", name));
        }
    }
}

fn check_tick(config: &toml::Value, errors: &mut Vec<String>) {
    let base = integer(config, "tick", "base_hz", errors).unwrap_or(100);
    let poll = integer(config, "tick", "poll_hz", errors).unwrap_or(5);

    if base <= 0 || poll <= 0 {
        errors.push("[tick] base_hz and poll_hz must be positive".to_string());
    } else if poll > base {
        errors.push("[tick] poll_hz must not exceed base_hz".to_string());
    } else if base % poll != 0 {
        errors.push(format!("[tick] poll_hz {} does not divide base_hz {}", poll, base));
    }
}

fn check_positive(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) {
    if let Some(value) = integer(config, section, key, errors) {
        if value <= 0 {
            errors.push(format!("[{}] {} must be positive", section, key));
        }
    }
}

fn integer(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> Option<i64> {
    let value = lookup(config, section, key)?;
    match value.as_integer() {
        Some(v) => Some(v),
        None => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

fn lookup<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section)?.get(key)
}
