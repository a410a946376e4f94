//! Ordered breakpoint table with linear interpolation.
//!
//! Queries outside the table are clamped to the first/last output
//! (flat extrapolation). Tables are validated once at construction.

use crate::error::{ControlError, Result};

// =============================================================================
// Built-in Curves
// =============================================================================

/// Fan speed (RPM) versus feels-like temperature (°C).
pub const SPEED_VS_COMFORT: [(f64, f64); 10] = [
    (20.0, 0.0),
    (22.0, 40.0),
    (24.0, 80.0),
    (26.0, 110.0),
    (28.0, 140.0),
    (30.0, 170.0),
    (32.0, 200.0),
    (34.0, 220.0),
    (36.0, 240.0),
    (38.0, 250.0),
];

/// Power draw (W) versus fan speed (RPM), measured on the reference motor.
/// The floor is 0.5 W, not 0 W: the driver idles with the motor stopped.
pub const POWER_VS_SPEED: [(f64, f64); 7] = [
    (0.0, 0.5),
    (50.0, 1.5),
    (80.0, 2.4),
    (100.0, 3.5),
    (150.0, 5.6),
    (200.0, 7.9),
    (250.0, 10.6),
];

// =============================================================================
// Curve
// =============================================================================

/// A single (input, output) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub input: f64,
    pub output: f64,
}

impl From<(f64, f64)> for Breakpoint {
    fn from((input, output): (f64, f64)) -> Self {
        Self { input, output }
    }
}

/// Immutable breakpoint table, strictly increasing in input.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    points: Vec<Breakpoint>,
}

impl Curve {
    /// Build a curve from (input, output) pairs.
    ///
    /// # Errors
    /// Returns `InvalidCurve` if there are fewer than two points, any value is
    /// not finite, or inputs are not strictly increasing.
    pub fn new(points: &[(f64, f64)]) -> Result<Self> {
        if points.len() < 2 {
            return Err(ControlError::InvalidCurve(format!(
                "need at least 2 breakpoints, got {}",
                points.len()
            )));
        }

        if let Some((x, y)) = points
            .iter()
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ControlError::InvalidCurve(format!(
                "non-finite breakpoint ({}, {})",
                x, y
            )));
        }

        for window in points.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(ControlError::InvalidCurve(format!(
                    "inputs must be strictly increasing: {} then {}",
                    window[0].0, window[1].0
                )));
            }
        }

        Ok(Self {
            points: points.iter().copied().map(Breakpoint::from).collect(),
        })
    }

    /// Speed-vs-comfort curve used by Auto and Budget modes.
    pub fn speed_vs_comfort() -> Result<Self> {
        Self::new(&SPEED_VS_COMFORT)
    }

    /// Power-vs-speed curve used to derive the Budget cap.
    pub fn power_vs_speed() -> Result<Self> {
        Self::new(&POWER_VS_SPEED)
    }

    /// Breakpoints in ascending input order.
    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    /// Interpolate the output for `x`.
    ///
    /// Uses linear interpolation between the bracketing breakpoints and
    /// clamps to the end outputs outside the table.
    pub fn lookup(&self, x: f64) -> f64 {
        // Construction guarantees at least two points.
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        // NaN fails every comparison and lands on the floor.
        if !(x > first.input) {
            return first.output;
        }
        if x >= last.input {
            return last.output;
        }

        for window in self.points.windows(2) {
            let (a, b) = (window[0], window[1]);
            if x >= a.input && x <= b.input {
                let ratio = (x - a.input) / (b.input - a.input);
                return a.output + ratio * (b.output - a.output);
            }
        }

        last.output
    }

    /// Reverse scan: the highest breakpoint input whose output is at most
    /// `max_output`, or `None` if no breakpoint qualifies.
    pub fn highest_input_within(&self, max_output: f64) -> Option<f64> {
        self.points
            .iter()
            .rev()
            .find(|p| p.output <= max_output)
            .map(|p| p.input)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn lookup_is_monotonic(a in -50.0f64..100.0, b in -50.0f64..100.0) {
            let curve = Curve::speed_vs_comfort().unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(curve.lookup(lo) <= curve.lookup(hi));
        }

        #[test]
        fn lookup_is_deterministic(x in -50.0f64..100.0) {
            let curve = Curve::speed_vs_comfort().unwrap();
            prop_assert_eq!(curve.lookup(x), curve.lookup(x));
        }

        #[test]
        fn lookup_stays_within_outputs(x in -50.0f64..100.0) {
            let curve = Curve::speed_vs_comfort().unwrap();
            let y = curve.lookup(x);
            prop_assert!((0.0..=250.0).contains(&y));
        }
    }
}
