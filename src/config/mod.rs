// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Configuration module

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// Log level
    pub log_level: String,

    /// Enable demo mode (simulated sensors)
    pub demo_mode: bool,

    /// Sensor configuration
    pub sensors: SensorConfig,

    /// Risk fusion configuration
    pub risk: RiskConfig,

    /// Monitoring loop configuration
    pub monitor: MonitorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Sentra".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            demo_mode: true,
            sensors: SensorConfig::default(),
            risk: RiskConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load or create default configuration
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let config = Self::default();

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            config.save(path)?;
            Ok(config)
        }
    }

    /// Get configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("sentra"))
            .unwrap_or_else(|| PathBuf::from("./config"))
    }

    /// Get default configuration path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

/// Which sensor categories are enabled. A disabled category is omitted from
/// the sample entirely, never zero-filled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Collect GPS fixes
    pub gps_enabled: bool,

    /// Collect accelerometer readings
    pub accelerometer_enabled: bool,

    /// Collect microphone distress assessments
    pub microphone_enabled: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            gps_enabled: true,
            accelerometer_enabled: true,
            microphone_enabled: true,
        }
    }
}

/// Risk fusion tuning.
///
/// The defaults reproduce the reference combination contract. They are
/// illustrative rather than the output of a validated risk model; a real
/// deployment recalibrates them here instead of patching the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Weight applied to the location sub-score
    pub location_weight: f64,

    /// Weight applied to the motion sub-score
    pub motion_weight: f64,

    /// Weight applied to the audio sub-score
    pub audio_weight: f64,

    /// Flat contribution added when the battery is low
    pub battery_penalty: f64,

    /// Battery percentage below which the penalty applies
    pub low_battery_cutoff: u8,

    /// Accelerometer magnitude mapped to a full motion sub-score
    pub motion_full_scale: f64,

    /// Score at and above which the category is MEDIUM
    pub medium_cut: f64,

    /// Score at and above which the category is HIGH
    pub high_cut: f64,

    /// Score at and above which the category is CRITICAL
    pub critical_cut: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            location_weight: 0.3,
            motion_weight: 0.2,
            audio_weight: 0.3,
            battery_penalty: 0.1,
            low_battery_cutoff: 15,
            motion_full_scale: 50.0,
            medium_cut: 0.3,
            high_cut: 0.6,
            critical_cut: 0.8,
        }
    }
}

/// Monitoring loop tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Sampling cadence in seconds
    pub cadence_secs: u64,

    /// Risk score at and above which an automatic escalation fires
    pub escalation_threshold: f64,

    /// Budget for a single provider read, in seconds
    pub sample_timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            cadence_secs: 2,
            escalation_threshold: 0.7,
            sample_timeout_secs: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_defaults() {
        let risk = RiskConfig::default();
        assert_eq!(risk.location_weight, 0.3);
        assert_eq!(risk.motion_weight, 0.2);
        assert_eq!(risk.audio_weight, 0.3);
        assert_eq!(risk.battery_penalty, 0.1);
        assert_eq!(risk.low_battery_cutoff, 15);
        assert_eq!(risk.motion_full_scale, 50.0);
        assert_eq!((risk.medium_cut, risk.high_cut, risk.critical_cut), (0.3, 0.6, 0.8));

        let monitor = MonitorConfig::default();
        assert_eq!(monitor.cadence_secs, 2);
        assert_eq!(monitor.escalation_threshold, 0.7);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.monitor.cadence_secs, config.monitor.cadence_secs);
        assert_eq!(parsed.risk.location_weight, config.risk.location_weight);
        assert!(parsed.sensors.gps_enabled);
    }
}
