//! # Engine Configuration
//!
//! Layered configuration for the notification engine: built-in defaults, an
//! optional TOML file, then `STATE_NOTIFY__*` environment overrides.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use state_notify::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let delay = manager.config().delay.default_duration();
//! println!("default disable delay: {delay:?}");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::constants::{defaults, environments};
use crate::state_machine::policy::DelayPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Deployment environment (test, development, production)
    pub environment: String,

    /// Structured logging settings
    pub logging: LoggingConfig,

    /// Delayed deactivation defaults for enable/disable listeners
    pub delay: DelayConfig,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            environment: environments::DEVELOPMENT.to_string(),
            logging: LoggingConfig::default(),
            delay: DelayConfig::default(),
        }
    }
}

impl NotifyConfig {
    /// Validate the merged configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.environment.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "environment",
                self.environment.clone(),
                "environment must not be empty",
            ));
        }

        if let Some(level) = &self.logging.level {
            const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
            if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ConfigurationError::invalid_value(
                    "logging.level",
                    level.clone(),
                    format!("expected one of {LEVELS:?}"),
                ));
            }
        }

        if self.delay.default_delay_ms > defaults::MAX_DELAY_MS {
            return Err(ConfigurationError::invalid_value(
                "delay.default_delay_ms",
                self.delay.default_delay_ms.to_string(),
                format!("must not exceed {} ms", defaults::MAX_DELAY_MS),
            ));
        }

        Ok(())
    }

    /// Log level to use, falling back to the environment mapping
    pub fn effective_log_level(&self) -> String {
        self.logging
            .level
            .clone()
            .unwrap_or_else(|| crate::logging::log_level_for(&self.environment))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit filter level; derived from the environment when unset
    pub level: Option<String>,
    pub log_directory: PathBuf,
    /// Write JSON log files in addition to console output
    pub file_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            log_directory: PathBuf::from(defaults::LOG_DIRECTORY),
            file_output: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DelayConfig {
    pub default_delay_ms: u64,
    /// Whether new enable/disable listeners delay deactivation unless told otherwise
    pub enabled_by_default: bool,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            default_delay_ms: defaults::DELAY_MS,
            enabled_by_default: false,
        }
    }
}

impl DelayConfig {
    pub fn default_duration(&self) -> Duration {
        Duration::from_millis(self.default_delay_ms)
    }

    /// Delay policy seeded from this configuration with no state restriction
    pub fn default_policy<S>(&self) -> DelayPolicy<S> {
        DelayPolicy::new(self.enabled_by_default, self.default_duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = NotifyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.delay.default_duration(), Duration::from_millis(1000));
        assert_eq!(config.effective_log_level(), "debug");
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = NotifyConfig::default();
        config.logging.level = Some("verbose".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { ref field, .. } if field == "logging.level"));
    }

    #[test]
    fn test_excessive_delay_rejected() {
        let mut config = NotifyConfig::default();
        config.delay.default_delay_ms = defaults::MAX_DELAY_MS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_policy_from_config() {
        let config = DelayConfig {
            default_delay_ms: 250,
            enabled_by_default: true,
        };
        let policy: DelayPolicy<String> = config.default_policy();
        assert!(policy.enabled);
        assert_eq!(policy.duration, Duration::from_millis(250));
        assert!(policy.delayed_states.is_empty());
    }
}
