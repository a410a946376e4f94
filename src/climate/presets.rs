//! Named climate presets.

use super::ClimateReading;

/// Pre-defined climate scenarios; each sets temperature and humidity together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimatePreset {
    /// 32°C / 40%.
    Sunny,
    /// 27°C / 80%.
    Humid,
    /// 20°C / 50%.
    Cool,
    /// 35°C / 60%.
    Hot,
}

impl ClimatePreset {
    pub const ALL: [ClimatePreset; 4] = [
        ClimatePreset::Sunny,
        ClimatePreset::Humid,
        ClimatePreset::Cool,
        ClimatePreset::Hot,
    ];

    pub const fn reading(&self) -> ClimateReading {
        match self {
            ClimatePreset::Sunny => ClimateReading::new(32.0, 40.0),
            ClimatePreset::Humid => ClimateReading::new(27.0, 80.0),
            ClimatePreset::Cool => ClimateReading::new(20.0, 50.0),
            ClimatePreset::Hot => ClimateReading::new(35.0, 60.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClimatePreset::Sunny => "sunny",
            ClimatePreset::Humid => "humid",
            ClimatePreset::Cool => "cool",
            ClimatePreset::Hot => "hot",
        }
    }
}

impl std::fmt::Display for ClimatePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reading = self.reading();
        write!(
            f,
            "{} ({}°C / {}%)",
            self.name(),
            reading.temperature_c,
            reading.humidity_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_readings() {
        assert_eq!(ClimatePreset::Sunny.reading(), ClimateReading::new(32.0, 40.0));
        assert_eq!(ClimatePreset::Humid.reading(), ClimateReading::new(27.0, 80.0));
        assert_eq!(ClimatePreset::Cool.reading(), ClimateReading::new(20.0, 50.0));
        assert_eq!(ClimatePreset::Hot.reading(), ClimateReading::new(35.0, 60.0));
    }

    #[test]
    fn test_preset_display() {
        assert_eq!(ClimatePreset::Hot.to_string(), "hot (35°C / 60%)");
    }
}
