//! Operator-selected operating mode.

use std::str::FromStr;

use crate::error::ControlError;

/// How the target speed is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingMode {
    /// Operator sets the speed directly.
    #[default]
    Manual,
    /// Speed follows the feels-like temperature.
    Auto,
    /// Auto speed, capped so power draw stays within the cost ceiling.
    Budget,
}

impl OperatingMode {
    pub fn name(&self) -> &'static str {
        match self {
            OperatingMode::Manual => "manual",
            OperatingMode::Auto => "auto",
            OperatingMode::Budget => "budget",
        }
    }
}

impl FromStr for OperatingMode {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(OperatingMode::Manual),
            "auto" => Ok(OperatingMode::Auto),
            "budget" => Ok(OperatingMode::Budget),
            _ => Err(ControlError::InvalidInput(format!(
                "Unknown mode '{}'. Use: manual, auto, or budget",
                s
            ))),
        }
    }
}

impl std::fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("manual".parse::<OperatingMode>().unwrap(), OperatingMode::Manual);
        assert_eq!("AUTO".parse::<OperatingMode>().unwrap(), OperatingMode::Auto);
        assert_eq!(" Budget ".parse::<OperatingMode>().unwrap(), OperatingMode::Budget);
        assert!("turbo".parse::<OperatingMode>().is_err());
    }

    #[test]
    fn test_mode_display_round_trips() {
        for mode in [OperatingMode::Manual, OperatingMode::Auto, OperatingMode::Budget] {
            assert_eq!(mode.to_string().parse::<OperatingMode>().unwrap(), mode);
        }
    }
}
