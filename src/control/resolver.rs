//! Setpoint resolution.
//!
//! Turns (mode, comfort value, manual speed, budget limits) into a single
//! quantized target speed. Out-of-range inputs are clamped rather than
//! rejected so the control loop always has a defined setpoint.

use crate::curve::Curve;
use crate::energy::max_power_watts;
use crate::error::{ControlError, Result};
use crate::protocol::{MAX_RPM, MIN_RPM};

use super::OperatingMode;

/// Default quantization step in RPM.
pub const DEFAULT_RPM_STEP: u16 = 5;

// =============================================================================
// Quantization
// =============================================================================

/// Granularity applied to every resolved setpoint. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantStep(u16);

impl QuantStep {
    /// # Errors
    /// Returns `InvalidQuantStep` for zero, negative, or oversized steps.
    pub fn new(step: i64) -> Result<Self> {
        match u16::try_from(step) {
            Ok(s) if s > 0 => Ok(Self(s)),
            _ => Err(ControlError::InvalidQuantStep(step)),
        }
    }

    pub fn get(&self) -> u16 {
        self.0
    }

    /// Round `target` to the nearest step and clamp to the firmware range.
    pub fn quantize(&self, target: f64) -> u16 {
        let step = f64::from(self.0);
        let quantized = (target / step).round() * step;
        if quantized.is_nan() {
            return MIN_RPM;
        }
        quantized.clamp(f64::from(MIN_RPM), f64::from(MAX_RPM)) as u16
    }
}

impl Default for QuantStep {
    fn default() -> Self {
        Self(DEFAULT_RPM_STEP)
    }
}

// =============================================================================
// Budget Limits
// =============================================================================

/// Spending ceiling used by Budget mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetLimits {
    /// Maximum spend per hour.
    pub max_cost_rate: f64,
    /// Electricity price per kWh.
    pub price_per_kwh: f64,
}

impl BudgetLimits {
    /// Power allowance in Watts. Zero when the price is not positive.
    pub fn max_power_watts(&self) -> f64 {
        max_power_watts(self.max_cost_rate, self.price_per_kwh)
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Outcome of one resolution, with the intermediate values for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Speed the comfort curve asks for.
    pub auto_rpm: u16,
    /// Power-derived cap; only present in Budget mode.
    pub budget_cap_rpm: Option<u16>,
    /// Quantized, clamped target to publish.
    pub target_rpm: u16,
}

/// Owns the two curves and the quantization step.
#[derive(Debug, Clone)]
pub struct SetpointResolver {
    speed_vs_comfort: Curve,
    power_vs_speed: Curve,
    step: QuantStep,
}

impl SetpointResolver {
    /// Resolver over the built-in curves.
    pub fn new(step: QuantStep) -> Result<Self> {
        Ok(Self::with_curves(
            Curve::speed_vs_comfort()?,
            Curve::power_vs_speed()?,
            step,
        ))
    }

    pub fn with_curves(speed_vs_comfort: Curve, power_vs_speed: Curve, step: QuantStep) -> Self {
        Self {
            speed_vs_comfort,
            power_vs_speed,
            step,
        }
    }

    pub fn step(&self) -> QuantStep {
        self.step
    }

    pub fn speed_vs_comfort(&self) -> &Curve {
        &self.speed_vs_comfort
    }

    pub fn power_vs_speed(&self) -> &Curve {
        &self.power_vs_speed
    }

    /// Speed for a comfort value, rounded to the nearest RPM.
    pub fn auto_rpm(&self, comfort_c: f64) -> u16 {
        to_rpm(self.speed_vs_comfort.lookup(comfort_c))
    }

    /// Highest tabulated speed whose power draw fits the budget, or 0.
    pub fn budget_cap_rpm(&self, limits: &BudgetLimits) -> u16 {
        self.power_vs_speed
            .highest_input_within(limits.max_power_watts())
            .map(to_rpm)
            .unwrap_or(MIN_RPM)
    }

    /// Resolve the target speed for the active mode.
    pub fn resolve(
        &self,
        mode: OperatingMode,
        comfort_c: f64,
        manual_rpm: u16,
        limits: &BudgetLimits,
    ) -> Resolution {
        let auto_rpm = self.auto_rpm(comfort_c);

        let (target, budget_cap_rpm) = match mode {
            OperatingMode::Manual => (manual_rpm.min(MAX_RPM), None),
            OperatingMode::Auto => (auto_rpm, None),
            OperatingMode::Budget => {
                let cap = self.budget_cap_rpm(limits);
                (auto_rpm.min(cap), Some(cap))
            }
        };

        Resolution {
            auto_rpm,
            budget_cap_rpm,
            target_rpm: self.step.quantize(f64::from(target)),
        }
    }
}

fn to_rpm(value: f64) -> u16 {
    if value.is_nan() {
        return MIN_RPM;
    }
    value
        .round()
        .clamp(f64::from(MIN_RPM), f64::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: BudgetLimits = BudgetLimits {
        max_cost_rate: 1.0,
        price_per_kwh: 8.0,
    };

    fn resolver() -> SetpointResolver {
        SetpointResolver::new(QuantStep::default()).unwrap()
    }

    #[test]
    fn test_quant_step_validation() {
        assert!(QuantStep::new(0).is_err());
        assert!(QuantStep::new(-5).is_err());
        assert!(QuantStep::new(70_000).is_err());
        assert_eq!(QuantStep::new(10).unwrap().get(), 10);
        assert_eq!(QuantStep::default().get(), DEFAULT_RPM_STEP);
    }

    #[test]
    fn test_quantize() {
        let step = QuantStep::default();
        assert_eq!(step.quantize(170.0), 170);
        assert_eq!(step.quantize(44.0), 45);
        assert_eq!(step.quantize(42.0), 40);
        assert_eq!(step.quantize(-3.0), 0);
        assert_eq!(step.quantize(400.0), 250);
        assert_eq!(step.quantize(f64::NAN), 0);
    }

    #[test]
    fn test_quantize_clamps_for_odd_steps() {
        let step = QuantStep::new(7).unwrap();
        // 250 / 7 rounds to 36 steps = 252, clamped to the maximum.
        assert_eq!(step.quantize(250.0), 250);
        assert_eq!(step.quantize(100.0), 98);
    }

    #[test]
    fn test_manual_mode_uses_operator_speed() {
        let r = resolver().resolve(OperatingMode::Manual, 35.0, 120, &LIMITS);
        assert_eq!(r.target_rpm, 120);
        assert_eq!(r.budget_cap_rpm, None);
    }

    #[test]
    fn test_manual_mode_clamps_operator_speed() {
        let r = resolver().resolve(OperatingMode::Manual, 25.0, 900, &LIMITS);
        assert_eq!(r.target_rpm, 250);
    }

    #[test]
    fn test_auto_mode_follows_curve() {
        let r = resolver().resolve(OperatingMode::Auto, 30.0, 0, &LIMITS);
        assert_eq!(r.auto_rpm, 170);
        assert_eq!(r.target_rpm, 170);

        let r = resolver().resolve(OperatingMode::Auto, 22.2, 0, &LIMITS);
        assert_eq!(r.auto_rpm, 44);
        assert_eq!(r.target_rpm, 45);
    }

    #[test]
    fn test_budget_mode_generous_ceiling() {
        // 1.0 per hour at 8.0 per kWh allows 125 W; the whole curve fits.
        let r = resolver().resolve(OperatingMode::Budget, 30.0, 0, &LIMITS);
        assert_eq!(r.budget_cap_rpm, Some(250));
        assert_eq!(r.target_rpm, 170);
    }

    #[test]
    fn test_budget_mode_caps_speed() {
        // 0.048 per hour at 8.0 per kWh allows 6 W: 150 RPM draws 5.6 W.
        let limits = BudgetLimits {
            max_cost_rate: 0.048,
            price_per_kwh: 8.0,
        };
        let r = resolver().resolve(OperatingMode::Budget, 36.0, 0, &limits);
        assert_eq!(r.auto_rpm, 240);
        assert_eq!(r.budget_cap_rpm, Some(150));
        assert_eq!(r.target_rpm, 150);
    }

    #[test]
    fn test_budget_below_idle_draw_stops_fan() {
        // 0.002 per hour at 8.0 per kWh allows 0.25 W, below the 0.5 W floor.
        let limits = BudgetLimits {
            max_cost_rate: 0.002,
            price_per_kwh: 8.0,
        };
        assert_eq!(resolver().budget_cap_rpm(&limits), 0);
        let r = resolver().resolve(OperatingMode::Budget, 36.0, 0, &limits);
        assert_eq!(r.target_rpm, 0);
    }

    #[test]
    fn test_budget_without_price_stops_fan() {
        for price in [0.0, -8.0, f64::NAN] {
            let limits = BudgetLimits {
                max_cost_rate: 1.0,
                price_per_kwh: price,
            };
            let r = resolver().resolve(OperatingMode::Budget, 36.0, 0, &limits);
            assert_eq!(r.budget_cap_rpm, Some(0));
            assert_eq!(r.target_rpm, 0);
        }
    }

    #[test]
    fn test_budget_negative_ceiling_stops_fan() {
        let limits = BudgetLimits {
            max_cost_rate: -1.0,
            price_per_kwh: 8.0,
        };
        assert_eq!(resolver().budget_cap_rpm(&limits), 0);
    }

    #[test]
    fn test_budget_infinite_ceiling() {
        let limits = BudgetLimits {
            max_cost_rate: f64::INFINITY,
            price_per_kwh: 8.0,
        };
        assert_eq!(resolver().budget_cap_rpm(&limits), 250);
    }
}
