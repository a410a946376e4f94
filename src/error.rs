//! Custom error types for the fan controller core.
//!
//! Only construction-time problems (bad curves, bad quantization step,
//! unreadable configuration) are meant to be fatal. Everything the control
//! loop meets at runtime is logged and dropped by the caller.

use thiserror::Error;

/// Main error type for controller operations.
#[derive(Error, Debug)]
pub enum ControlError {
    /// Breakpoint table is unusable (too short, not strictly increasing, non-finite).
    #[error("Invalid curve: {0}")]
    InvalidCurve(String),

    /// Quantization step must be a positive integer.
    #[error("Invalid quantization step {0}. Must be a positive integer")]
    InvalidQuantStep(i64),

    /// Telemetry payload could not be decoded.
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String },

    /// Operator input rejected by the input surface.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport refused or failed a publish.
    #[error("Transport error: {0}")]
    Transport(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControlError>;
