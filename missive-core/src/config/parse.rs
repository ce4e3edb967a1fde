//! Minimal TOML reader for `device.toml`
//!
//! Handles only the subset the device file uses:
//! - `[section]` headers
//! - `key = value` pairs with integer or string values
//! - `#` comments, whole-line or trailing
//!
//! Unknown keys are ignored so newer files still load on older firmware.
//! Unknown sections are an error.

use super::types::DeviceConfig;
use crate::ingest::BackspacePolicy;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unrecognized or malformed `[section]` header
    InvalidSection,
    /// Value could not be parsed for its key
    InvalidValue,
    /// A tick rate is zero
    ZeroRate,
    /// `poll_hz` exceeds `base_hz`
    PollRateTooHigh,
    /// `poll_hz` does not divide `base_hz`
    PollRateNotDivisor,
    /// `stable_polls` is zero
    ZeroDebounce,
    /// `baudrate` is zero
    ZeroBaudrate,
    /// `liveness_ms` is zero
    ZeroLiveness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Tick,
    Ingest,
    Input,
    Serial,
    Runtime,
}

impl DeviceConfig {
    /// Parse and validate a `device.toml` document
    ///
    /// Keys that are absent keep their default values.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut config = DeviceConfig::default();
        let mut section = Section::Root;

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') {
                section = parse_section_header(line)?;
                continue;
            }

            if let Some((key, value)) = parse_key_value(line) {
                apply_value(&mut config, section, key, value)?;
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_section_header(line: &str) -> Result<Section, ConfigError> {
    let header = line
        .strip_prefix('[')
        .and_then(|rest| rest.split('#').next())
        .map(str::trim)
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or(ConfigError::InvalidSection)?;

    match header.trim() {
        "tick" => Ok(Section::Tick),
        "ingest" => Ok(Section::Ingest),
        "input" => Ok(Section::Input),
        "serial" => Ok(Section::Serial),
        "runtime" => Ok(Section::Runtime),
        _ => Err(ConfigError::InvalidSection),
    }
}

fn apply_value(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    match (section, key) {
        (Section::Tick, "base_hz") => config.tick.base_hz = parse_int(value)?,
        (Section::Tick, "poll_hz") => config.tick.poll_hz = parse_int(value)?,
        (Section::Ingest, "backspace") => config.ingest.backspace = parse_backspace(value)?,
        (Section::Input, "stable_polls") => config.input.stable_polls = parse_int(value)?,
        (Section::Serial, "baudrate") => config.serial.baudrate = parse_int(value)?,
        (Section::Runtime, "liveness_ms") => config.runtime.liveness_ms = parse_int(value)?,
        _ => {} // Ignore unknown keys
    }
    Ok(())
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();

    // Remove inline comments outside quotes
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an integer value (`_` separators allowed)
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for ch in value.chars().filter(|c| *c != '_') {
        digits.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_backspace(value: &str) -> Result<BackspacePolicy, ConfigError> {
    match parse_string(value) {
        "wrap" => Ok(BackspacePolicy::Wrap),
        "clamp" => Ok(BackspacePolicy::Clamp),
        _ => Err(ConfigError::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_TOML: &str = r#"
# Missive device configuration

[tick]
base_hz = 200
poll_hz = 10   # joystick polling

[ingest]
backspace = "clamp"

[input]
stable_polls = 2

[serial]
baudrate = 115_200

[runtime]
liveness_ms = 500
"#;

    #[test]
    fn test_parse_full_document() {
        let config = DeviceConfig::parse(DEVICE_TOML).unwrap();
        assert_eq!(config.tick.base_hz, 200);
        assert_eq!(config.tick.poll_hz, 10);
        assert_eq!(config.ingest.backspace, BackspacePolicy::Clamp);
        assert_eq!(config.input.stable_polls, 2);
        assert_eq!(config.serial.baudrate, 115_200);
        assert_eq!(config.runtime.liveness_ms, 500);
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(DeviceConfig::parse(""), Ok(DeviceConfig::default()));
    }

    #[test]
    fn test_unknown_key_ignored() {
        let config = DeviceConfig::parse("[tick]\nturbo = 1\npoll_hz = 4\n").unwrap();
        assert_eq!(config.tick.poll_hz, 4);
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert_eq!(
            DeviceConfig::parse("[network]\nhost = \"x\"\n"),
            Err(ConfigError::InvalidSection)
        );
        assert_eq!(
            DeviceConfig::parse("[tick\n"),
            Err(ConfigError::InvalidSection)
        );
    }

    #[test]
    fn test_bad_values_rejected() {
        assert_eq!(
            DeviceConfig::parse("[tick]\nbase_hz = fast\n"),
            Err(ConfigError::InvalidValue)
        );
        assert_eq!(
            DeviceConfig::parse("[ingest]\nbackspace = \"delete\"\n"),
            Err(ConfigError::InvalidValue)
        );
    }

    #[test]
    fn test_parse_validates() {
        assert_eq!(
            DeviceConfig::parse("[tick]\npoll_hz = 7\n"),
            Err(ConfigError::PollRateNotDivisor)
        );
    }

    #[test]
    fn test_unquoted_backspace_accepted() {
        let config = DeviceConfig::parse("[ingest]\nbackspace = wrap\n").unwrap();
        assert_eq!(config.ingest.backspace, BackspacePolicy::Wrap);
    }
}
