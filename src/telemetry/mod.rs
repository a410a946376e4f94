//! Bounded telemetry history.

mod buffer;

pub use buffer::{TELEMETRY_CAPACITY, TelemetryBuffer, TelemetrySample};
