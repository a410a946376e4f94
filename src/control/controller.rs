//! Single control path.
//!
//! Every input (operator change, motor status, timer tick, connectivity
//! change) arrives as a [`ControlEvent`] and is applied in full before the
//! next one: update inputs, recompute comfort, resolve the setpoint, run the
//! publish gate, then record telemetry.

use log::{debug, info, warn};
use std::time::Instant;

use crate::climate::{ClimatePreset, ClimateReading, ComfortBand};
use crate::config::ControllerConfig;
use crate::energy::{EnergyAccumulator, current_cost_rate, rate_usage_percent};
use crate::error::Result;
use crate::protocol::{MAX_RPM, MotorStatus, encode_setpoint};
use crate::telemetry::TelemetryBuffer;
use crate::transport::Transport;
use crate::utils::format::local_now;

use super::{
    BudgetLimits, ControllerSnapshot, OperatingMode, PublishGate, PublishReason, Resolution,
    SetpointResolver,
};

/// An input on the control path.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    SetMode(OperatingMode),
    SetManualRpm(u16),
    SetTemperature(f64),
    SetHumidity(f64),
    SetClimate(ClimateReading),
    ApplyPreset(ClimatePreset),
    SetPrice(f64),
    SetMaxCostRate(f64),
    /// Raw payload received on the motor status topic.
    StatusMessage(Vec<u8>),
    ConnectionChanged(bool),
    Tick(Instant),
    /// Start a new accounting day.
    ResetDay(Instant),
}

/// Operator-facing numeric fields are floored at zero; NaN counts as zero.
fn floor_at_zero(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

/// Owns all controller state and applies events to it.
#[derive(Debug)]
pub struct FanController {
    resolver: SetpointResolver,
    gate: PublishGate,
    mode: OperatingMode,
    manual_rpm: u16,
    reading: ClimateReading,
    comfort_c: f64,
    limits: BudgetLimits,
    motor: MotorStatus,
    energy: EnergyAccumulator,
    telemetry: TelemetryBuffer,
    connected: bool,
    setpoint_topic: String,
}

impl FanController {
    /// Build a controller from configuration. Starts disconnected in Manual
    /// mode at 0 RPM.
    ///
    /// # Errors
    /// Fails on a non-positive quantization step or an unusable curve.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        let resolver = SetpointResolver::new(config.quant_step()?)?;
        Ok(Self::with_resolver(resolver, config, Instant::now()))
    }

    /// Build with an explicit resolver and accounting start time.
    pub fn with_resolver(
        resolver: SetpointResolver,
        config: &ControllerConfig,
        started: Instant,
    ) -> Self {
        let reading = ClimateReading::default();
        let price = floor_at_zero(config.price_per_kwh);

        Self {
            resolver,
            gate: PublishGate::new(),
            mode: OperatingMode::default(),
            manual_rpm: 0,
            reading,
            comfort_c: reading.feels_like(),
            limits: BudgetLimits {
                max_cost_rate: floor_at_zero(config.max_cost_rate),
                price_per_kwh: price,
            },
            motor: MotorStatus::default(),
            energy: EnergyAccumulator::starting_at(started, price),
            telemetry: TelemetryBuffer::new(),
            connected: false,
            setpoint_topic: config.setpoint_topic.clone(),
        }
    }

    /// Apply one event and run the recomputation chain.
    ///
    /// Returns the setpoint published as a result, if any.
    pub fn handle<T: Transport>(&mut self, event: ControlEvent, transport: &mut T) -> Option<u16> {
        self.apply(event);
        let published = self.recompute(transport);
        self.record_telemetry();
        published
    }

    fn apply(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SetMode(mode) => {
                if mode != self.mode {
                    info!("Operating mode: {} -> {}", self.mode, mode);
                }
                self.mode = mode;
            }
            ControlEvent::SetManualRpm(rpm) => {
                self.manual_rpm = rpm.min(MAX_RPM);
            }
            ControlEvent::SetTemperature(t) => {
                self.set_reading(ClimateReading::new(t, self.reading.humidity_pct));
            }
            ControlEvent::SetHumidity(h) => {
                self.set_reading(ClimateReading::new(self.reading.temperature_c, h));
            }
            ControlEvent::SetClimate(reading) => self.set_reading(reading),
            ControlEvent::ApplyPreset(preset) => {
                info!("Applying climate preset {}", preset);
                self.set_reading(preset.reading());
            }
            ControlEvent::SetPrice(price) => {
                if price < 0.0 || price.is_nan() {
                    warn!("Electricity price {} treated as 0 (no power allowance)", price);
                }
                let price = floor_at_zero(price);
                self.limits.price_per_kwh = price;
                self.energy.set_price(price);
            }
            ControlEvent::SetMaxCostRate(rate) => {
                self.limits.max_cost_rate = floor_at_zero(rate);
            }
            ControlEvent::StatusMessage(payload) => match MotorStatus::parse(&payload) {
                Ok(status) => {
                    debug!("Motor status: {}", status);
                    self.motor = status;
                }
                Err(e) => warn!("Dropping motor status: {}", e),
            },
            ControlEvent::ConnectionChanged(connected) => {
                if connected != self.connected {
                    info!(
                        "Transport {}",
                        if connected { "connected" } else { "disconnected" }
                    );
                }
                self.connected = connected;
            }
            ControlEvent::Tick(now) => {
                self.energy.tick(now, self.motor.power_watts);
            }
            ControlEvent::ResetDay(now) => {
                info!(
                    "New day: resetting energy ({:.6} kWh, cost {:.4})",
                    self.energy.energy_kwh(),
                    self.energy.cost()
                );
                self.energy.reset(now);
            }
        }
    }

    fn set_reading(&mut self, reading: ClimateReading) {
        self.reading = reading;
        self.comfort_c = reading.feels_like();
    }

    /// Resolve the current target without touching the gate.
    pub fn resolution(&self) -> Resolution {
        self.resolver
            .resolve(self.mode, self.comfort_c, self.manual_rpm, &self.limits)
    }

    fn recompute<T: Transport>(&mut self, transport: &mut T) -> Option<u16> {
        let target = self.resolution().target_rpm;

        // Nothing is committed while offline; the next input after
        // reconnecting re-evaluates the gate.
        if !self.connected {
            return None;
        }

        let reason = self.gate.check(target, self.mode)?;

        if let Err(e) = transport.publish(&self.setpoint_topic, &encode_setpoint(target)) {
            warn!("Failed to publish setpoint {}: {}", target, e);
            return None;
        }

        info!(
            "[Control] mode={}, feelsLike={}, manualRPM={} -> targetRPM={}{}",
            self.mode,
            self.comfort_c,
            self.manual_rpm,
            target,
            if reason == PublishReason::ModeChanged {
                " (mode changed)"
            } else {
                ""
            }
        );
        self.gate.commit(target, self.mode);
        Some(target)
    }

    fn record_telemetry(&mut self) {
        let (comfort, rpm, cost) = (self.comfort_c, self.motor.actual_rpm, self.energy.cost());
        let unchanged = self.telemetry.latest().is_some_and(|s| {
            s.comfort_c == comfort && s.actual_rpm == rpm && s.cumulative_cost == cost
        });
        if !unchanged {
            self.telemetry
                .record(local_now(), comfort, rpm, cost);
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    pub fn manual_rpm(&self) -> u16 {
        self.manual_rpm
    }

    pub fn reading(&self) -> ClimateReading {
        self.reading
    }

    pub fn comfort_c(&self) -> f64 {
        self.comfort_c
    }

    pub fn limits(&self) -> BudgetLimits {
        self.limits
    }

    pub fn motor(&self) -> &MotorStatus {
        &self.motor
    }

    pub fn energy(&self) -> &EnergyAccumulator {
        &self.energy
    }

    pub fn telemetry(&self) -> &TelemetryBuffer {
        &self.telemetry
    }

    pub fn gate(&self) -> &PublishGate {
        &self.gate
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Point-in-time view for display.
    pub fn snapshot(&self) -> ControllerSnapshot {
        let resolution = self.resolution();
        let cost_rate = current_cost_rate(self.motor.power_watts, self.limits.price_per_kwh);

        ControllerSnapshot {
            mode: self.mode,
            connected: self.connected,
            reading: self.reading,
            comfort_c: self.comfort_c,
            comfort_band: ComfortBand::from_feels_like(self.comfort_c),
            manual_rpm: self.manual_rpm,
            auto_rpm: resolution.auto_rpm,
            budget_cap_rpm: resolution.budget_cap_rpm,
            commanded_rpm: self.gate.last_published(),
            motor: self.motor,
            max_power_watts: self.limits.max_power_watts(),
            energy_kwh: self.energy.energy_kwh(),
            cost: self.energy.cost(),
            cost_rate,
            rate_usage_percent: rate_usage_percent(cost_rate, self.limits.max_cost_rate),
            telemetry_samples: self.telemetry.len(),
            mean_rpm: self.telemetry.mean_rpm(),
            mean_comfort: self.telemetry.mean_comfort(),
        }
    }
}
