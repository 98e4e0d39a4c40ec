//! Configuration loading from TOML files

mod classes;

pub use classes::{CryptLordConfig, RoundStartPolicy, UltimateConfig, UndeadScourgeConfig, WardenConfig};

use crate::curve::LevelCurve;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Session-wide tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Events processed per dispatch before the rest of the cascade is dropped
    #[serde(default = "default_max_event_cascade")]
    pub max_event_cascade: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_event_cascade: default_max_event_cascade(),
        }
    }
}

fn default_max_event_cascade() -> usize {
    64
}

/// Complete configuration: session settings plus one table per class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub session: SessionConfig,
    pub crypt_lord: CryptLordConfig,
    pub undead_scourge: UndeadScourgeConfig,
    pub warden: WardenConfig,
}

impl HeroConfig {
    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.max_event_cascade == 0 {
            return Err(invalid("session.max_event_cascade must be at least 1"));
        }
        self.crypt_lord.validate()?;
        self.undead_scourge.validate()?;
        self.warden.validate()?;
        Ok(())
    }
}

/// Load and validate a configuration file
pub fn load_config(path: &Path) -> Result<HeroConfig, ConfigError> {
    let config: HeroConfig = load_toml(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate a configuration string
pub fn parse_config(content: &str) -> Result<HeroConfig, ConfigError> {
    let config: HeroConfig = parse_toml(content)?;
    config.validate()?;
    Ok(config)
}

/// Get the bundled configuration
pub fn default_config() -> HeroConfig {
    let toml = include_str!("../../config/classes.toml");
    parse_config(toml).unwrap_or_else(|err| {
        tracing::warn!(%err, "bundled class config rejected, using built-in defaults");
        HeroConfig::default()
    })
}

pub(crate) fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(message.into())
}

pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(invalid(format!("{name} must not be negative (got {value})")));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(format!("{name} must be positive (got {value})")));
    }
    Ok(())
}

pub(crate) fn check_curve(name: &str, curve: &LevelCurve) -> Result<(), ConfigError> {
    if !curve.is_valid() {
        return Err(invalid(format!("{name}: min {} exceeds max {}", curve.min, curve.max)));
    }
    Ok(())
}
