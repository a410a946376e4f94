//! Instantaneous cost-rate helpers.

/// Maximum power draw (W) that keeps spending within `max_cost_rate` per
/// hour at `price_per_kwh`.
///
/// A non-positive price means no power allowance at all and yields 0.
pub fn max_power_watts(max_cost_rate: f64, price_per_kwh: f64) -> f64 {
    if !(price_per_kwh > 0.0) {
        return 0.0;
    }
    (max_cost_rate / price_per_kwh) * 1000.0
}

/// Current spending rate (cost per hour) for a given power draw.
pub fn current_cost_rate(power_watts: f64, price_per_kwh: f64) -> f64 {
    (power_watts / 1000.0) * price_per_kwh
}

/// Share of the cost ceiling currently in use, in percent.
/// Returns 0 when the ceiling is not positive.
pub fn rate_usage_percent(cost_rate: f64, max_cost_rate: f64) -> f64 {
    if max_cost_rate > 0.0 {
        (cost_rate / max_cost_rate) * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_power() {
        assert_eq!(max_power_watts(1.0, 8.0), 125.0);
        assert_eq!(max_power_watts(0.004, 8.0), 0.5);
    }

    #[test]
    fn test_max_power_without_price() {
        assert_eq!(max_power_watts(1.0, 0.0), 0.0);
        assert_eq!(max_power_watts(1.0, -3.0), 0.0);
        assert_eq!(max_power_watts(1.0, f64::NAN), 0.0);
    }

    #[test]
    fn test_cost_rate() {
        assert_eq!(current_cost_rate(10.0, 8.0), 0.08);
        assert_eq!(rate_usage_percent(0.5, 1.0), 50.0);
        assert_eq!(rate_usage_percent(0.5, 0.0), 0.0);
    }
}
