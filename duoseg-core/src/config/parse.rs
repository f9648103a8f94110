//! Parser for the embedded device configuration
//!
//! Handles the small TOML subset the config file uses:
//! - `[section]` headers
//! - `key = integer` pairs
//! - `#` comments, full-line or trailing
//!
//! Strings, arrays and inline tables are not supported.

use super::types::{DeviceConfig, MAX_BRIGHTNESS, MAX_THRESHOLD, MIN_SETTLE_US};

/// Config parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Section header not recognised
    InvalidSection,
    /// Key not recognised in its section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    InvalidLine,
    /// Value is not an integer of the expected type
    InvalidValue,
    /// Value parsed but is outside the allowed range
    OutOfRange,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::InvalidSection => "unknown section",
            ConfigError::UnknownKey => "unknown key",
            ConfigError::InvalidLine => "malformed line",
            ConfigError::InvalidValue => "invalid value",
            ConfigError::OutOfRange => "value out of range",
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Timing,
    Input,
    Display,
    Serial,
}

/// Parse the config text, starting from defaults
pub fn parse_config(input: &str) -> Result<DeviceConfig, ConfigError> {
    let mut config = DeviceConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidLine)?;
        apply_value(&mut config, section, key, value)?;
    }

    validate(&config)?;
    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "timing" => Ok(Section::Timing),
        "input" => Ok(Section::Input),
        "display" => Ok(Section::Display),
        "serial" => Ok(Section::Serial),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Split "key = value"
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse an integer, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    let mut digits: heapless::String<16> = heapless::String::new();
    for ch in value.chars().filter(|&c| c != '_') {
        digits.push(ch).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ConfigError::InvalidValue)
}

fn apply_value(
    config: &mut DeviceConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    let timing = &mut config.timing;
    let input = &mut config.input;

    match (section, key) {
        (Section::Timing, "blink_interval_ms") => timing.blink_interval_ms = parse_int(value)?,
        (Section::Timing, "blink_poll_ms") => timing.blink_poll_ms = parse_int(value)?,
        (Section::Timing, "settle_us") => timing.settle_us = parse_int(value)?,
        (Section::Input, "idle_timeout_ms") => input.idle_timeout_ms = parse_int(value)?,
        (Section::Input, "byte_timeout_ms") => input.byte_timeout_ms = parse_int(value)?,
        (Section::Input, "default_threshold") => input.default_threshold = parse_int(value)?,
        (Section::Display, "brightness") => config.display.brightness = parse_int(value)?,
        (Section::Serial, "baudrate") => config.serial.baudrate = parse_int(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn validate(config: &DeviceConfig) -> Result<(), ConfigError> {
    let timing = &config.timing;
    let input = &config.input;

    let ok = timing.blink_interval_ms > 0
        && timing.blink_poll_ms > 0
        && timing.settle_us >= MIN_SETTLE_US
        && input.byte_timeout_ms > 0
        && input.idle_timeout_ms > input.byte_timeout_ms
        && (0..=MAX_THRESHOLD).contains(&input.default_threshold)
        && config.display.brightness <= MAX_BRIGHTNESS
        && config.serial.baudrate > 0;

    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange)
    }
}
