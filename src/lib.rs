//! Coolstream Library
//!
//! Decision core for a climate-responsive fan controller. It turns a
//! temperature/humidity reading into a feels-like comfort value, resolves a
//! motor speed setpoint for the active operating mode, publishes it only when
//! it changes, and keeps a running energy and cost account from the motor's
//! reported power draw.
//!
//! # Features
//!
//! - Feels-like comfort estimate blended from two heat-index regimes
//! - Manual, Auto, and Budget operating modes
//! - Quantized setpoints with deduplicated publishing
//! - Daily energy and cost accounting with a rolling telemetry history
//!
//! # Example
//!
//! ```
//! use coolstream::climate::ClimateReading;
//! use coolstream::config::ControllerConfig;
//! use coolstream::control::{ControlEvent, FanController, OperatingMode};
//! use coolstream::transport::ConsoleTransport;
//!
//! fn main() -> coolstream::Result<()> {
//!     let mut controller = FanController::new(&ControllerConfig::default())?;
//!     let mut transport = ConsoleTransport::new(Vec::new());
//!
//!     controller.handle(ControlEvent::ConnectionChanged(true), &mut transport);
//!     controller.handle(
//!         ControlEvent::SetClimate(ClimateReading::new(30.0, 50.0)),
//!         &mut transport,
//!     );
//!     let published =
//!         controller.handle(ControlEvent::SetMode(OperatingMode::Auto), &mut transport);
//!
//!     assert_eq!(published, Some(185));
//!     Ok(())
//! }
//! ```

pub mod climate;
pub mod config;
pub mod control;
pub mod curve;
pub mod energy;
pub mod error;
pub mod protocol;
pub mod runtime;
pub mod telemetry;
pub mod transport;
pub mod utils;

// Re-exports for convenience
pub use control::{ControlEvent, FanController, OperatingMode};
pub use error::{ControlError, Result};
pub use transport::{ConsoleTransport, Transport};
