//! Command egress definitions.
//!
//! The firmware subscribes to the setpoint topic and expects the target
//! speed as a plain decimal string, e.g. `"170"`.

// =============================================================================
// Topics
// =============================================================================

/// Telemetry published by the motor firmware (JSON).
pub const TOPIC_MOTOR_STATUS: &str = "motor/status";

/// Setpoint commands consumed by the motor firmware.
pub const TOPIC_SETPOINT: &str = "motor/command/setpoint";

// =============================================================================
// Speed Limits
// =============================================================================

/// Highest speed the firmware accepts.
pub const MAX_RPM: u16 = 250;

/// Lowest speed (motor stopped).
pub const MIN_RPM: u16 = 0;

// =============================================================================
// Command Builders
// =============================================================================

/// Encode a setpoint command payload.
pub fn encode_setpoint(rpm: u16) -> String {
    rpm.to_string()
}
