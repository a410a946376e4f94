//! Feels-like temperature estimator.
//!
//! Blends the raw temperature with a Celsius heat-index polynomial. The
//! heat-index weight ramps linearly from 0 at 15°C to 1 at 27°C, so cool
//! readings are reported as-is and warm/humid ones follow the polynomial.

/// Lower bound of the reported comfort value.
pub const COMFORT_MIN_C: f64 = -20.0;
/// Upper bound of the reported comfort value.
pub const COMFORT_MAX_C: f64 = 60.0;

/// Temperature where the heat-index weight starts rising.
const BLEND_START_C: f64 = 15.0;
/// Width of the blend ramp (weight reaches 1 at 27°C).
const BLEND_SPAN_C: f64 = 12.0;

// Heat-index polynomial coefficients (T in °C, RH in %).
const C0: f64 = -8.784_694_755_56;
const C_T: f64 = 1.611_394_11;
const C_RH: f64 = 2.338_548_838_89;
const C_T_RH: f64 = -0.146_116_05;
const C_T2: f64 = -0.012_308_094;
const C_RH2: f64 = -0.016_424_827_777_8;
const C_T2_RH: f64 = 0.002_211_732;
const C_T_RH2: f64 = 0.000_725_46;
const C_T2_RH2: f64 = -0.000_003_582;

/// A temperature/humidity sample.
///
/// The operator surface keeps readings within 10-40°C and 20-90%; the
/// estimator accepts any finite value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

impl ClimateReading {
    pub const fn new(temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            temperature_c,
            humidity_pct,
        }
    }

    /// Feels-like value for this reading.
    pub fn feels_like(&self) -> f64 {
        feels_like(self.temperature_c, self.humidity_pct)
    }
}

impl Default for ClimateReading {
    fn default() -> Self {
        Self::new(25.0, 50.0)
    }
}

fn heat_index(t: f64, rh: f64) -> f64 {
    C0 + C_T * t
        + C_RH * rh
        + C_T_RH * t * rh
        + C_T2 * t * t
        + C_RH2 * rh * rh
        + C_T2_RH * t * t * rh
        + C_T_RH2 * t * rh * rh
        + C_T2_RH2 * t * t * rh * rh
}

/// Compute the feels-like temperature in °C.
///
/// Result is clamped to [-20, 60] and rounded to one decimal.
pub fn feels_like(temperature_c: f64, humidity_pct: f64) -> f64 {
    let t = temperature_c;
    let w = ((t - BLEND_START_C) / BLEND_SPAN_C).clamp(0.0, 1.0);
    let blended = t * (1.0 - w) + heat_index(t, humidity_pct) * w;

    // NaN inputs collapse to the lower bound.
    let clamped = if blended.is_nan() {
        COMFORT_MIN_C
    } else {
        blended.clamp(COMFORT_MIN_C, COMFORT_MAX_C)
    };

    (clamped * 10.0).round() / 10.0
}

// =============================================================================
// Comfort Bands
// =============================================================================

/// Human-readable comfort classification of a feels-like value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComfortBand {
    Comfortable,
    Pleasant,
    Warm,
    Hot,
    VeryHot,
}

impl ComfortBand {
    pub fn from_feels_like(feels_like: f64) -> Self {
        match feels_like {
            f if f < 22.0 => ComfortBand::Comfortable,
            f if f < 25.0 => ComfortBand::Pleasant,
            f if f < 29.0 => ComfortBand::Warm,
            f if f < 32.0 => ComfortBand::Hot,
            _ => ComfortBand::VeryHot,
        }
    }
}

impl std::fmt::Display for ComfortBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComfortBand::Comfortable => write!(f, "Comfortable"),
            ComfortBand::Pleasant => write!(f, "Pleasant"),
            ComfortBand::Warm => write!(f, "Warm"),
            ComfortBand::Hot => write!(f, "Hot"),
            ComfortBand::VeryHot => write!(f, "Very Hot"),
        }
    }
}
