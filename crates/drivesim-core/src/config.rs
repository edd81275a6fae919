//! Dashboard configuration
//!
//! Settings are stored as pretty-printed JSON. Every section and field has a
//! default, so a partial file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::protocol::MAX_MESSAGE_LEN;

/// Default device address (the rig's access point WebSocket)
pub const DEFAULT_ADDRESS: &str = "ws://192.168.4.1:8765/ws";

/// Errors loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid JSON for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Transport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// `ws://` URL of the device, or `host:port` / `tcp://host:port` of a
    /// line bridge
    pub address: String,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Longest accepted message line in bytes
    pub max_line_length: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            connect_timeout_ms: 5000,
            max_line_length: MAX_MESSAGE_LEN,
        }
    }
}

impl TransportConfig {
    /// Connect timeout as a duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Animation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Length of the speed readout tween
    pub speed_tween_ms: u64,
    /// Tilt filter response time; a step this long closes the whole gap
    pub tilt_response_ms: u64,
    /// Animation tick period
    pub tick_interval_ms: u64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            speed_tween_ms: 100,
            tilt_response_ms: 200,
            tick_interval_ms: 16,
        }
    }
}

impl SmoothingConfig {
    /// Animation tick period as a duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Speedometer geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Speed at full deflection, km/h
    pub max_speed_kmh: f64,
    /// Stroke length of the gauge arc
    pub stroke_length: f64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            max_speed_kmh: 180.0,
            stroke_length: 615.0,
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Transport settings
    pub transport: TransportConfig,
    /// Animation settings
    pub smoothing: SmoothingConfig,
    /// Speedometer geometry
    pub gauge: GaugeConfig,
}

impl DashboardConfig {
    /// Default config file location (`<config dir>/drivesim/config.json`)
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("drivesim")
            .join("config.json")
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, falling back to defaults if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.address.trim().is_empty() {
            return Err(ConfigError::Invalid("transport.address is empty".into()));
        }
        if self.transport.address.trim().starts_with("wss://") {
            return Err(ConfigError::Invalid(
                "transport.address: wss:// is not supported, the rig serves plain ws://".into(),
            ));
        }
        if self.transport.max_line_length == 0 {
            return Err(ConfigError::Invalid(
                "transport.max_line_length must be positive".into(),
            ));
        }
        if self.smoothing.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "smoothing.tick_interval_ms must be positive".into(),
            ));
        }
        if !(self.gauge.max_speed_kmh > 0.0) || !(self.gauge.stroke_length > 0.0) {
            return Err(ConfigError::Invalid(
                "gauge.max_speed_kmh and gauge.stroke_length must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.smoothing.speed_tween_ms, 100);
        assert_eq!(config.smoothing.tilt_response_ms, 200);
        assert_eq!(config.gauge.stroke_length, 615.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{"smoothing": {"speed_tween_ms": 250}}"#).unwrap();
        assert_eq!(config.smoothing.speed_tween_ms, 250);
        assert_eq!(config.smoothing.tick_interval_ms, 16);
        assert_eq!(config.transport.address, DEFAULT_ADDRESS);
    }

    #[test]
    fn test_default_address_is_the_rig_websocket() {
        let config = TransportConfig::default();
        assert!(config.address.starts_with("ws://"));
        assert!(config.address.ends_with("/ws"));
    }

    #[test]
    fn test_validate_rejects_secure_websocket() {
        let mut config = DashboardConfig::default();
        config.transport.address = "wss://rig.local/ws".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.transport.address = "tcp://127.0.0.1:9000".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_tick() {
        let mut config = DashboardConfig::default();
        config.smoothing.tick_interval_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_gauge() {
        let mut config = DashboardConfig::default();
        config.gauge.max_speed_kmh = 0.0;
        assert!(config.validate().is_err());
        config.gauge.max_speed_kmh = f64::NAN;
        assert!(config.validate().is_err());
    }
}
