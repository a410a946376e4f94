//! Point-in-time controller view for display.

use crate::climate::{ClimateReading, ComfortBand};
use crate::protocol::MotorStatus;

use super::OperatingMode;

/// Everything an operator display needs, captured at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSnapshot {
    pub mode: OperatingMode,
    pub connected: bool,
    pub reading: ClimateReading,
    pub comfort_c: f64,
    pub comfort_band: ComfortBand,
    pub manual_rpm: u16,
    pub auto_rpm: u16,
    /// Only present in Budget mode.
    pub budget_cap_rpm: Option<u16>,
    /// Last setpoint actually published. The firmware's own `targetRPM`
    /// is informational and lives in `motor`.
    pub commanded_rpm: Option<u16>,
    pub motor: MotorStatus,
    pub max_power_watts: f64,
    pub energy_kwh: f64,
    pub cost: f64,
    /// Spend per hour at the current power draw.
    pub cost_rate: f64,
    pub rate_usage_percent: f64,
    pub telemetry_samples: usize,
    pub mean_rpm: Option<f64>,
    pub mean_comfort: Option<f64>,
}

fn rpm_or_dash(value: Option<u16>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn mean_or_dash(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.*}", decimals, v))
}

impl std::fmt::Display for ControllerSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "+-----------------------------------------+")?;
        writeln!(f, "|          Coolstream Controller          |")?;
        writeln!(f, "+-----------------------------------------+")?;
        writeln!(f, "|  Mode:          {:<24}|", self.mode.name())?;
        writeln!(
            f,
            "|  Link:          {:<24}|",
            if self.connected { "Connected" } else { "Disconnected" }
        )?;
        writeln!(f, "+-----------------------------------------+")?;
        writeln!(
            f,
            "|  Climate:       {:>5.1} C / {:>4.1} %       |",
            self.reading.temperature_c, self.reading.humidity_pct
        )?;
        writeln!(
            f,
            "|  Feels Like:    {:>5.1} C ({:<12})|",
            self.comfort_c,
            self.comfort_band.to_string()
        )?;
        writeln!(f, "+-----------------------------------------+")?;
        writeln!(f, "|  Manual:        {:>5} RPM               |", self.manual_rpm)?;
        writeln!(f, "|  Auto:          {:>5} RPM               |", self.auto_rpm)?;
        writeln!(
            f,
            "|  Budget Cap:    {:>5} RPM               |",
            rpm_or_dash(self.budget_cap_rpm)
        )?;
        writeln!(
            f,
            "|  Commanded:     {:>5} RPM               |",
            rpm_or_dash(self.commanded_rpm)
        )?;
        writeln!(f, "+-----------------------------------------+")?;
        writeln!(f, "|  Motor:         {:<24}|", self.motor.mode.to_string())?;
        writeln!(
            f,
            "|  Actual:        {:>5.0} RPM ({:<8})     |",
            self.motor.actual_rpm,
            self.motor.speed_level().to_string()
        )?;
        writeln!(
            f,
            "|  Power:         {:>7.2} W / {:>7.2} W   |",
            self.motor.power_watts, self.max_power_watts
        )?;
        writeln!(f, "+-----------------------------------------+")?;
        writeln!(f, "|  Energy Today:  {:>10.6} kWh          |", self.energy_kwh)?;
        writeln!(f, "|  Cost Today:    {:>10.4}              |", self.cost)?;
        writeln!(
            f,
            "|  Cost Rate:     {:>10.4}/hr ({:>5.1}%)  |",
            self.cost_rate, self.rate_usage_percent
        )?;
        writeln!(
            f,
            "|  History:       {:>4} samples            |",
            self.telemetry_samples
        )?;
        writeln!(
            f,
            "|  Avg Speed:     {:>5} RPM               |",
            mean_or_dash(self.mean_rpm, 0)
        )?;
        writeln!(
            f,
            "|  Avg Comfort:   {:>5} C                 |",
            mean_or_dash(self.mean_comfort, 1)
        )?;
        writeln!(f, "+-----------------------------------------+")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::climate::ClimateReading;
    use crate::config::ControllerConfig;
    use crate::control::{ControlEvent, FanController};
    use crate::transport::MemoryTransport;

    #[test]
    fn test_snapshot_display() {
        let controller = FanController::new(&ControllerConfig::default()).unwrap();
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.commanded_rpm, None);
        assert_eq!(snapshot.budget_cap_rpm, None);

        let text = snapshot.to_string();
        assert!(text.contains("Coolstream Controller"));
        assert!(text.contains("|  Mode:          manual"));
        assert!(text.contains("|  Link:          Disconnected"));
        assert!(text.lines().all(|l| l.starts_with('+') || l.starts_with('|')));
    }

    #[test]
    fn test_snapshot_shows_telemetry_means() {
        let mut controller = FanController::new(&ControllerConfig::default()).unwrap();
        let mut transport = MemoryTransport::default();
        controller.handle(
            ControlEvent::SetClimate(ClimateReading::new(30.0, 50.0)),
            &mut transport,
        );

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.mean_comfort, Some(31.0));
        assert_eq!(snapshot.mean_rpm, Some(0.0));

        let text = snapshot.to_string();
        assert!(text.contains("|  Avg Comfort:    31.0 C"));
        assert!(text.contains("|  Avg Speed:         0 RPM"));
    }
}
