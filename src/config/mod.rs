//! Configuration management for the lock controller daemon.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support (`CONFIG_PATH`)
//! - Environment variable overrides (`LOCK__` prefix)
//! - Component-wise validation
mod actuator;
mod device;
mod monitoring;
mod sensor;
pub use actuator::*;
pub use device::*;
pub use monitoring::*;
pub use sensor::*;


use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Main configuration container for the lock controller
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct LockNodeConfig {
    /// Device identity and on-disk locations
    #[serde(default)]
    pub device: DeviceConfig,
    /// Position sensor and debounce pipeline
    #[serde(default)]
    pub sensor: SensorConfig,
    /// Bolt stepper motor
    #[serde(default)]
    pub actuator: ActuatorConfig,
    /// Metrics and monitoring settings
    #[serde(default)]
    pub monitoring: MonitoringConfig,
}

impl Debug for LockNodeConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("LockNodeConfig")
            .field("device", &self.device)
            .field("sensor", &self.sensor)
            .finish()
    }
}

impl LockNodeConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `LOCK__` prefix (highest priority)
    ///
    /// # Note
    /// Validation is deferred so that further overrides can be applied with
    /// `with_override_config()`. Callers MUST call `validate()` before using
    /// the configuration.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("CONFIG_PATH", "config/lock.toml");
    /// std::env::set_var("LOCK__SENSOR__DEBOUNCE_QUIET_PERIOD_MS", "150");
    /// let cfg = LockNodeConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("LOCK")
                .separator("__")
                .ignore_empty(true)
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix("LOCK")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.device.validate()?;
        self.sensor.validate()?;
        self.actuator.validate()?;
        self.monitoring.validate()?;
        Ok(self)
    }
}
