//! Energy and cost tracking.

mod accumulator;
mod cost;

pub use accumulator::EnergyAccumulator;
pub use cost::{current_cost_rate, max_power_watts, rate_usage_percent};
