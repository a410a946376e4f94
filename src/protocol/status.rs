//! Motor status parsing.
//!
//! The firmware publishes a JSON object on `motor/status`:
//!
//! ```json
//! {"mode": "RUNNING", "actualRPM": 168, "targetRPM": 170, "pwm": 142, "power": 7.4}
//! ```
//!
//! `mode`, `actualRPM` and `power` are required; `targetRPM` and `pwm` are
//! informational and default to 0 when absent.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, Result};

/// Power draw reported before the first status message arrives.
pub const IDLE_POWER_WATTS: f64 = 0.5;

// =============================================================================
// Motor Mode
// =============================================================================

/// Firmware operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MotorMode {
    #[default]
    Idle,
    Running,
    Autotuning,
}

impl std::fmt::Display for MotorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotorMode::Idle => write!(f, "Idle"),
            MotorMode::Running => write!(f, "Running"),
            MotorMode::Autotuning => write!(f, "Tuning"),
        }
    }
}

// =============================================================================
// Speed Level
// =============================================================================

/// Coarse classification of the measured speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedLevel {
    Idle,
    Low,
    Medium,
    High,
}

impl SpeedLevel {
    pub fn from_rpm(rpm: f64) -> Self {
        match rpm {
            r if r < 10.0 => SpeedLevel::Idle,
            r if r < 100.0 => SpeedLevel::Low,
            r if r < 200.0 => SpeedLevel::Medium,
            _ => SpeedLevel::High,
        }
    }
}

impl std::fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeedLevel::Idle => write!(f, "Idle"),
            SpeedLevel::Low => write!(f, "Low"),
            SpeedLevel::Medium => write!(f, "Medium"),
            SpeedLevel::High => write!(f, "High"),
        }
    }
}

// =============================================================================
// Status Structure
// =============================================================================

/// Motor status readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorStatus {
    /// Firmware state.
    pub mode: MotorMode,
    /// Measured speed in RPM.
    #[serde(rename = "actualRPM")]
    pub actual_rpm: f64,
    /// Target as seen by the firmware. Informational only.
    #[serde(rename = "targetRPM", default)]
    pub target_rpm: f64,
    /// PWM duty applied to the driver.
    #[serde(rename = "pwm", default)]
    pub pwm_duty: f64,
    /// Instantaneous power draw in Watts.
    #[serde(rename = "power")]
    pub power_watts: f64,
}

impl MotorStatus {
    /// Parse a status payload.
    ///
    /// # Errors
    /// Returns `MalformedPayload` if the payload is not valid JSON, lacks a
    /// required field, or carries negative/non-finite speed or power.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let status: MotorStatus =
            serde_json::from_slice(payload).map_err(|e| ControlError::MalformedPayload {
                message: format!("Invalid motor status JSON: {}", e),
            })?;

        if !status.power_watts.is_finite() || status.power_watts < 0.0 {
            return Err(ControlError::MalformedPayload {
                message: format!("Invalid power reading {} W", status.power_watts),
            });
        }

        if !status.actual_rpm.is_finite() || status.actual_rpm < 0.0 {
            return Err(ControlError::MalformedPayload {
                message: format!("Invalid speed reading {} RPM", status.actual_rpm),
            });
        }

        Ok(status)
    }

    pub fn speed_level(&self) -> SpeedLevel {
        SpeedLevel::from_rpm(self.actual_rpm)
    }
}

impl Default for MotorStatus {
    fn default() -> Self {
        Self {
            mode: MotorMode::Idle,
            actual_rpm: 0.0,
            target_rpm: 0.0,
            pwm_duty: 0.0,
            power_watts: IDLE_POWER_WATTS,
        }
    }
}

impl std::fmt::Display for MotorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {:.0} RPM ({}) | PWM {:.0} | {:.1} W",
            self.mode,
            self.actual_rpm,
            self.speed_level(),
            self.pwm_duty,
            self.power_watts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        let payload =
            br#"{"mode":"RUNNING","actualRPM":168,"targetRPM":170,"pwm":142,"power":7.4}"#;
        let status = MotorStatus::parse(payload).unwrap();
        assert_eq!(status.mode, MotorMode::Running);
        assert_eq!(status.actual_rpm, 168.0);
        assert_eq!(status.target_rpm, 170.0);
        assert_eq!(status.pwm_duty, 142.0);
        assert_eq!(status.power_watts, 7.4);
    }

    #[test]
    fn test_parse_minimal_status() {
        let payload = br#"{"mode":"AUTOTUNING","actualRPM":12.5,"power":0.9}"#;
        let status = MotorStatus::parse(payload).unwrap();
        assert_eq!(status.mode, MotorMode::Autotuning);
        assert_eq!(status.target_rpm, 0.0);
        assert_eq!(status.pwm_duty, 0.0);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(MotorStatus::parse(b"not json").is_err());
        assert!(MotorStatus::parse(b"{}").is_err());
        assert!(MotorStatus::parse(br#"{"mode":"SPINNING","actualRPM":1,"power":1}"#).is_err());
        assert!(MotorStatus::parse(br#"{"mode":"IDLE","actualRPM":"fast","power":1}"#).is_err());
        assert!(MotorStatus::parse(br#"{"mode":"IDLE","actualRPM":0,"power":-1}"#).is_err());
        assert!(MotorStatus::parse(br#"{"mode":"IDLE","actualRPM":-3,"power":1}"#).is_err());
    }

    #[test]
    fn test_default_status_idles() {
        let status = MotorStatus::default();
        assert_eq!(status.mode, MotorMode::Idle);
        assert_eq!(status.power_watts, IDLE_POWER_WATTS);
        assert_eq!(status.speed_level(), SpeedLevel::Idle);
    }

    #[test]
    fn test_speed_levels() {
        assert_eq!(SpeedLevel::from_rpm(9.9), SpeedLevel::Idle);
        assert_eq!(SpeedLevel::from_rpm(10.0), SpeedLevel::Low);
        assert_eq!(SpeedLevel::from_rpm(150.0), SpeedLevel::Medium);
        assert_eq!(SpeedLevel::from_rpm(200.0), SpeedLevel::High);
    }
}
