//! Cumulative energy/cost integration.
//!
//! Driven by a periodic tick: each tick multiplies the current power draw by
//! the wall-clock time since the previous tick. The first tick measures from
//! construction, not from zero.

use log::debug;
use std::time::Instant;

const SECS_PER_HOUR: f64 = 3600.0;

/// Clamp a caller-supplied quantity to a finite, non-negative value.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Running energy (kWh) and cost totals for the current day.
#[derive(Debug, Clone)]
pub struct EnergyAccumulator {
    energy_kwh: f64,
    cost: f64,
    price_per_kwh: f64,
    last_tick: Instant,
}

impl EnergyAccumulator {
    /// Start accumulating now.
    pub fn new(price_per_kwh: f64) -> Self {
        Self::starting_at(Instant::now(), price_per_kwh)
    }

    /// Start accumulating with `started` as the implicit previous tick.
    pub fn starting_at(started: Instant, price_per_kwh: f64) -> Self {
        Self {
            energy_kwh: 0.0,
            cost: 0.0,
            price_per_kwh: non_negative(price_per_kwh),
            last_tick: started,
        }
    }

    /// Price applied to energy accumulated from now on. Negative or
    /// non-finite prices are treated as free.
    pub fn set_price(&mut self, price_per_kwh: f64) {
        self.price_per_kwh = non_negative(price_per_kwh);
    }

    /// Integrate `power_watts` over the time since the previous tick.
    ///
    /// Returns the energy added in kWh. A clock that appears to run
    /// backwards contributes zero elapsed time.
    pub fn tick(&mut self, now: Instant, power_watts: f64) -> f64 {
        let elapsed_hours =
            now.saturating_duration_since(self.last_tick).as_secs_f64() / SECS_PER_HOUR;
        self.last_tick = now.max(self.last_tick);

        let energy_wh = non_negative(power_watts) * elapsed_hours;
        let energy_kwh = energy_wh / 1000.0;

        self.energy_kwh += energy_kwh;
        self.cost += energy_kwh * self.price_per_kwh;

        debug!(
            "Energy tick: +{:.9} kWh, total {:.6} kWh, cost {:.6}",
            energy_kwh, self.energy_kwh, self.cost
        );

        energy_kwh
    }

    /// Zero both totals and restart the interval at `now`.
    pub fn reset(&mut self, now: Instant) {
        self.energy_kwh = 0.0;
        self.cost = 0.0;
        self.last_tick = now;
    }

    pub fn energy_kwh(&self) -> f64 {
        self.energy_kwh
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn price_per_kwh(&self) -> f64 {
        self.price_per_kwh
    }

    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    proptest! {
        #[test]
        fn totals_never_decrease(
            ticks in proptest::collection::vec((0u64..5_000, 0.0f64..20.0), 1..100)
        ) {
            let start = Instant::now();
            let mut acc = EnergyAccumulator::starting_at(start, 8.0);
            let mut at = start;
            let (mut energy, mut cost) = (0.0, 0.0);

            for (millis, watts) in ticks {
                at += Duration::from_millis(millis);
                acc.tick(at, watts);
                prop_assert!(acc.energy_kwh() >= energy);
                prop_assert!(acc.cost() >= cost);
                energy = acc.energy_kwh();
                cost = acc.cost();
            }

            acc.reset(at);
            prop_assert_eq!(acc.energy_kwh(), 0.0);
            prop_assert_eq!(acc.cost(), 0.0);
        }
    }
}
