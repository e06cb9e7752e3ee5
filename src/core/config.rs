//! Configuration management for the value cache.
//!
//! This module provides configuration handling with:
//! - YAML file support
//! - Programmatic construction through `ConfigBuilder`
//! - Validation and defaults

use crate::core::identity::MAX_IDENTIFIER_LEN;
use crate::core::{CacheError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache behaviour
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of missed intervals after which an entry is evicted
    pub timeout_multiplier: u32,
    /// Interval assumed for samples that carry none
    #[serde(with = "humantime_serde")]
    pub default_interval: Duration,
    /// Period of the background sweeper
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
    /// Maximum identifier length in bytes
    pub max_identifier_len: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
    /// Include targets, thread ids and line numbers
    pub structured: bool,
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Everything, including per-sample detail
    Trace,
    /// Rejected samples and sweeps
    Debug,
    /// Lifecycle messages
    Info,
    /// Warnings only
    Warn,
    /// Errors only
    Error,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            timeout_multiplier: 2,
            default_interval: Duration::from_secs(10),
            sweep_interval: Duration::from_secs(10),
            max_identifier_len: MAX_IDENTIFIER_LEN,
        }
    }
}

impl CacheConfig {
    /// Validate the cache settings
    pub fn validate(&self) -> Result<()> {
        if self.timeout_multiplier == 0 {
            return Err(CacheError::config("timeout_multiplier must be greater than 0"));
        }

        if self.default_interval.is_zero() {
            return Err(CacheError::config("default_interval must be greater than 0"));
        }

        if self.sweep_interval.is_zero() {
            return Err(CacheError::config("sweep_interval must be greater than 0"));
        }

        // host + plugin + type separators need at least "a/b/c"
        if self.max_identifier_len < 5 {
            return Err(CacheError::config(format!(
                "max_identifier_len must be at least 5, got {}",
                self.max_identifier_len
            )));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: LogLevel::Info,
            structured: false,
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Result<Self> {
        let config = Config::default();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()
    }
}

impl LogLevel {
    /// Convert to tracing filter string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Configuration builder for programmatic construction
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        ConfigBuilder {
            config: Config::default(),
        }
    }

    /// Load configuration from YAML string
    pub fn from_yaml(mut self, yaml: &str) -> Result<Self> {
        self.config = serde_yaml::from_str(yaml)
            .map_err(|e| CacheError::config(format!("Failed to parse YAML config: {}", e)))?;
        Ok(self)
    }

    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::info!("Loaded configuration from: {:?}", path);
        self.from_yaml(&content)
    }

    /// Set timeout multiplier
    pub fn timeout_multiplier(mut self, multiplier: u32) -> Self {
        self.config.cache.timeout_multiplier = multiplier;
        self
    }

    /// Set default sample interval
    pub fn default_interval(mut self, interval: Duration) -> Self {
        self.config.cache.default_interval = interval;
        self
    }

    /// Set sweeper period
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.cache.sweep_interval = interval;
        self
    }

    /// Set maximum identifier length
    pub fn max_identifier_len(mut self, len: usize) -> Self {
        self.config.cache.max_identifier_len = len;
        self
    }

    /// Set log level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
