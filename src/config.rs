//! Controller configuration.
//!
//! Loaded once at startup: built-in defaults, then an optional JSON file,
//! then environment variables (a `.env` file is honoured). The result is
//! immutable for the lifetime of the controller.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::control::{DEFAULT_RPM_STEP, QuantStep};
use crate::error::{ControlError, Result};
use crate::protocol::{TOPIC_MOTOR_STATUS, TOPIC_SETPOINT};

// =============================================================================
// Config Path
// =============================================================================

const APP_NAME: &str = "coolstream";
const CONFIG_FILE: &str = "config.json";

/// Get the configuration directory path.
/// - Linux: ~/.config/coolstream/
/// - Windows: %APPDATA%\coolstream\
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join(APP_NAME))
        .ok_or_else(|| ControlError::Config("Could not find config directory".into()))
}

/// Get the full path to the config file.
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE))
}

// =============================================================================
// Environment Keys
// =============================================================================

const ENV_MQTT_URL: &str = "COOLSTREAM_MQTT_URL";
const ENV_MQTT_USERNAME: &str = "COOLSTREAM_MQTT_USERNAME";
const ENV_MQTT_PASSWORD: &str = "COOLSTREAM_MQTT_PASSWORD";
const ENV_CLIENT_ID: &str = "COOLSTREAM_CLIENT_ID";
const ENV_RPM_STEP: &str = "COOLSTREAM_RPM_STEP";
const ENV_PRICE: &str = "COOLSTREAM_PRICE_PER_KWH";
const ENV_MAX_COST_RATE: &str = "COOLSTREAM_MAX_COST_RATE";
const ENV_TICK_MS: &str = "COOLSTREAM_TICK_MS";

// =============================================================================
// Structures
// =============================================================================

/// Broker endpoint and credentials. Opaque to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

fn default_url() -> String {
    "wss://localhost:8084/mqtt".to_string()
}

fn default_username() -> String {
    "esp32-client".to_string()
}

fn default_password() -> String {
    "esp32-client".to_string()
}

fn default_client_id() -> String {
    "coolstream-dashboard".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            username: default_username(),
            password: default_password(),
            client_id: default_client_id(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub transport: TransportConfig,

    /// Topic carrying motor telemetry.
    #[serde(default = "default_status_topic")]
    pub status_topic: String,

    /// Topic receiving setpoint commands.
    #[serde(default = "default_setpoint_topic")]
    pub setpoint_topic: String,

    /// Setpoint quantization step in RPM. Must be positive.
    #[serde(default = "default_rpm_step")]
    pub rpm_step: i64,

    /// Initial electricity price per kWh.
    #[serde(default = "default_price")]
    pub price_per_kwh: f64,

    /// Initial cost ceiling per hour for Budget mode.
    #[serde(default = "default_max_cost_rate")]
    pub max_cost_rate: f64,

    /// Energy accounting tick period in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_interval_ms: u64,
}

fn default_status_topic() -> String {
    TOPIC_MOTOR_STATUS.to_string()
}

fn default_setpoint_topic() -> String {
    TOPIC_SETPOINT.to_string()
}

fn default_rpm_step() -> i64 {
    i64::from(DEFAULT_RPM_STEP)
}

fn default_price() -> f64 {
    8.0
}

fn default_max_cost_rate() -> f64 {
    1.0
}

fn default_tick_ms() -> u64 {
    1000
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::default(),
            status_topic: default_status_topic(),
            setpoint_topic: default_setpoint_topic(),
            rpm_step: default_rpm_step(),
            price_per_kwh: default_price(),
            max_cost_rate: default_max_cost_rate(),
            tick_interval_ms: default_tick_ms(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration.
    ///
    /// With `path`, that file must exist. Without it, the default config file
    /// is used when present. Environment variables override both.
    ///
    /// # Errors
    /// Returns `Config` for unreadable files or bad overrides and
    /// `InvalidQuantStep` for a non-positive step.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match get_config_path() {
                Ok(default_path) if default_path.exists() => Self::from_file(&default_path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ControlError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ControlError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_MQTT_URL) {
            self.transport.url = url;
        }
        if let Some(username) = lookup(ENV_MQTT_USERNAME) {
            self.transport.username = username;
        }
        if let Some(password) = lookup(ENV_MQTT_PASSWORD) {
            self.transport.password = password;
        }
        if let Some(client_id) = lookup(ENV_CLIENT_ID) {
            self.transport.client_id = client_id;
        }
        if let Some(step) = lookup(ENV_RPM_STEP) {
            self.rpm_step = parse_env(ENV_RPM_STEP, &step)?;
        }
        if let Some(price) = lookup(ENV_PRICE) {
            self.price_per_kwh = parse_env(ENV_PRICE, &price)?;
        }
        if let Some(rate) = lookup(ENV_MAX_COST_RATE) {
            self.max_cost_rate = parse_env(ENV_MAX_COST_RATE, &rate)?;
        }
        if let Some(tick) = lookup(ENV_TICK_MS) {
            self.tick_interval_ms = parse_env(ENV_TICK_MS, &tick)?;
        }
        Ok(())
    }

    /// Reject settings the controller cannot start with.
    pub fn validate(&self) -> Result<()> {
        self.quant_step()?;
        if self.tick_interval_ms == 0 {
            return Err(ControlError::Config(
                "tick_interval_ms must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn quant_step(&self) -> Result<QuantStep> {
        QuantStep::new(self.rpm_step)
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_interval_ms)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ControlError::Config(format!("Invalid value '{}' for {}", value, key)))
}
