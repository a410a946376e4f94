//! Parsing utilities for operator input.
//!
//! The interactive controller reads one command per line:
//!
//! | Line | Effect |
//! |---|---|
//! | `mode auto` | switch operating mode (`manual`, `auto`, `budget`) |
//! | `manual 120` | manual speed, 0-250 RPM in steps of 10 |
//! | `temp 31.5` | temperature, 10-40 °C |
//! | `humidity 60` | relative humidity, 20-90 % |
//! | `climate 31.5 60` | both at once |
//! | `preset hot` | `sunny`, `humid`, `cool`, `hot` |
//! | `price 8.0` | electricity price per kWh |
//! | `ceiling 1.0` | cost ceiling per hour |
//! | `status {...}` | motor status JSON, as received on the status topic |
//! | `connected true` | transport link up/down |
//! | `reset` | start a new accounting day |
//! | `show` | print the controller snapshot |
//! | `history` | print the recorded telemetry samples |

use std::ops::RangeInclusive;
use std::time::Instant;

use crate::climate::{ClimatePreset, ClimateReading};
use crate::control::{ControlEvent, OperatingMode};
use crate::error::{ControlError, Result};
use crate::protocol::MAX_RPM;

/// Temperature range accepted from the operator (°C).
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 10.0..=40.0;
/// Humidity range accepted from the operator (%).
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 20.0..=90.0;
/// Granularity of the manual speed control (RPM).
pub const MANUAL_RPM_STEP: u16 = 10;

/// A parsed operator line.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorInput {
    Control(ControlEvent),
    Show,
    History,
}

// =============================================================================
// Value Parsing
// =============================================================================

/// Parse an operating mode name.
pub fn parse_mode(name: &str) -> Result<OperatingMode> {
    name.parse()
}

/// Parse a preset name: "sunny", "humid", "cool", or "hot".
///
/// # Example
/// ```
/// use coolstream::climate::ClimatePreset;
/// use coolstream::utils::parsing::parse_preset;
///
/// assert_eq!(parse_preset("Hot").unwrap(), ClimatePreset::Hot);
/// assert!(parse_preset("arctic").is_err());
/// ```
pub fn parse_preset(name: &str) -> Result<ClimatePreset> {
    let lower = name.trim().to_lowercase();
    ClimatePreset::ALL
        .into_iter()
        .find(|p| p.name() == lower)
        .ok_or_else(|| {
            ControlError::InvalidInput(format!(
                "Unknown preset '{}'. Use: sunny, humid, cool, or hot",
                name
            ))
        })
}

/// Parse a manual speed: 0-250 RPM in steps of 10.
pub fn parse_manual_rpm(value: &str) -> Result<u16> {
    let rpm: u16 = value.trim().parse().map_err(|_| {
        ControlError::InvalidInput(format!("Invalid speed '{}'. Use 0-{}", value, MAX_RPM))
    })?;
    if rpm > MAX_RPM {
        return Err(ControlError::InvalidInput(format!(
            "Speed {} out of range. Use 0-{}",
            rpm, MAX_RPM
        )));
    }
    if rpm % MANUAL_RPM_STEP != 0 {
        return Err(ControlError::InvalidInput(format!(
            "Speed {} is not a multiple of {}",
            rpm, MANUAL_RPM_STEP
        )));
    }
    Ok(rpm)
}

fn parse_number(label: &str, value: &str) -> Result<f64> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| ControlError::InvalidInput(format!("Invalid {} '{}'", label, value)))?;
    if !parsed.is_finite() {
        return Err(ControlError::InvalidInput(format!(
            "Invalid {} '{}'",
            label, value
        )));
    }
    Ok(parsed)
}

fn parse_in_range(label: &str, value: &str, range: &RangeInclusive<f64>) -> Result<f64> {
    let parsed = parse_number(label, value)?;
    if !range.contains(&parsed) {
        return Err(ControlError::InvalidInput(format!(
            "{} {} out of range. Use {}-{}",
            label,
            parsed,
            range.start(),
            range.end()
        )));
    }
    Ok(parsed)
}

/// Parse a temperature within the operator range.
pub fn parse_temperature(value: &str) -> Result<f64> {
    parse_in_range("temperature", value, &TEMPERATURE_RANGE)
}

/// Parse a humidity within the operator range.
pub fn parse_humidity(value: &str) -> Result<f64> {
    parse_in_range("humidity", value, &HUMIDITY_RANGE)
}

/// Parse a boolean flag ("true"/"false", "on"/"off", "up"/"down").
pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "on" | "up" | "1" => Ok(true),
        "false" | "off" | "down" | "0" => Ok(false),
        _ => Err(ControlError::InvalidInput(format!(
            "Invalid flag '{}'. Use true or false",
            value
        ))),
    }
}

// =============================================================================
// Line Parsing
// =============================================================================

/// Parse one operator line. Returns `Ok(None)` for blank lines and `#` comments.
///
/// Prices and cost ceilings are passed through unchecked apart from being
/// numbers; the controller floors them at zero.
pub fn parse_operator_line(line: &str) -> Result<Option<OperatorInput>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (keyword, rest) = line
        .split_once(char::is_whitespace)
        .map(|(k, r)| (k, r.trim()))
        .unwrap_or((line, ""));

    let event = match keyword.to_lowercase().as_str() {
        "show" => return Ok(Some(OperatorInput::Show)),
        "history" => return Ok(Some(OperatorInput::History)),
        "mode" => ControlEvent::SetMode(parse_mode(rest)?),
        "manual" => ControlEvent::SetManualRpm(parse_manual_rpm(rest)?),
        "temp" | "temperature" => ControlEvent::SetTemperature(parse_temperature(rest)?),
        "humidity" => ControlEvent::SetHumidity(parse_humidity(rest)?),
        "climate" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(t), Some(h), None) => ControlEvent::SetClimate(ClimateReading::new(
                    parse_temperature(t)?,
                    parse_humidity(h)?,
                )),
                _ => {
                    return Err(ControlError::InvalidInput(
                        "Use: climate <temperature> <humidity>".into(),
                    ));
                }
            }
        }
        "preset" => ControlEvent::ApplyPreset(parse_preset(rest)?),
        "price" => ControlEvent::SetPrice(parse_number("price", rest)?),
        "ceiling" => ControlEvent::SetMaxCostRate(parse_number("cost ceiling", rest)?),
        "status" => ControlEvent::StatusMessage(rest.as_bytes().to_vec()),
        "connected" => ControlEvent::ConnectionChanged(parse_flag(rest)?),
        "reset" => ControlEvent::ResetDay(Instant::now()),
        _ => {
            return Err(ControlError::InvalidInput(format!(
                "Unknown command '{}'",
                keyword
            )));
        }
    };

    Ok(Some(OperatorInput::Control(event)))
}

// =============================================================================
// Tests
// =============================================================================
