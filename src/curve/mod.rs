//! Breakpoint curves.
//!
//! Piecewise-linear lookup shared by the auto-speed curve and the
//! power budget curve.

mod table;

pub use table::{Breakpoint, Curve, POWER_VS_SPEED, SPEED_VS_COMFORT};
