//! Climate inputs and the feels-like comfort estimator.

mod comfort;
mod presets;

pub use comfort::{COMFORT_MAX_C, COMFORT_MIN_C, ClimateReading, ComfortBand, feels_like};
pub use presets::ClimatePreset;
