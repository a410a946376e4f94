//! Wire protocol between the controller and the motor firmware.
//!
//! Topic names, setpoint command encoding, and motor status decoding.

pub mod commands;
pub mod status;

pub use commands::*;
pub use status::*;
