//! Configuration management for `WateringScale`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WateringError;
use crate::lockout::{DEFAULT_LOCKOUT_THRESHOLD_IN, LockoutPolicy};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted three-day lockout threshold, in inches
const MAX_LOCKOUT_THRESHOLD_IN: f64 = 10.0;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WateringConfig {
    /// Scale computation settings
    #[serde(default)]
    pub scale: ScaleConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings that change how a scale is computed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaleConfig {
    /// What a rain lockout does to the scale
    #[serde(default)]
    pub lockout_policy: LockoutPolicy,
    /// Three-day rainfall (in) above which watering is locked out
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold_in: f64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_lockout_threshold() -> f64 {
    DEFAULT_LOCKOUT_THRESHOLD_IN
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            lockout_policy: LockoutPolicy::default(),
            lockout_threshold_in: default_lockout_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WateringConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // WATERINGSCALE__SCALE__LOCKOUT_POLICY=force_zero
        builder = builder.add_source(
            Environment::with_prefix("WATERINGSCALE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WateringConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wateringscale").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let threshold = self.scale.lockout_threshold_in;
        if !(0.0..=MAX_LOCKOUT_THRESHOLD_IN).contains(&threshold) {
            return Err(WateringError::config(format!(
                "Lockout threshold must be between 0 and {MAX_LOCKOUT_THRESHOLD_IN} inches, got {threshold}"
            ))
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WateringError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WateringError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "wateringscale-{}-{name}.toml",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = WateringConfig::default();
        assert_eq!(config.scale.lockout_policy, LockoutPolicy::Restrict);
        assert!((config.scale.lockout_threshold_in - 0.01).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WateringConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_invalid_log_format() {
        let mut config = WateringConfig::default();
        config.logging.format = "xml".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WateringConfig::default();
        config.scale.lockout_threshold_in = -0.5;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Lockout threshold"));

        config.scale.lockout_threshold_in = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_strings() {
        let mut config = WateringConfig::default();
        config.logging.level = String::new();
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let path = temp_config(
            "load",
            "[scale]\nlockout_policy = \"force_zero\"\nlockout_threshold_in = 0.1\n\n[logging]\nlevel = \"debug\"\n",
        );
        let config = WateringConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(path).ok();

        assert_eq!(config.scale.lockout_policy, LockoutPolicy::ForceZero);
        assert!((config.scale.lockout_threshold_in - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let path = temp_config("invalid", "[scale]\nlockout_threshold_in = 50.0\n");
        let result = WateringConfig::load_from_path(Some(path.clone()));
        std::fs::remove_file(path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = WateringConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("wateringscale"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
