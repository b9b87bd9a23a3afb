//! Configuration Loader
//!
//! Merges built-in defaults, an optional TOML file and `STATE_NOTIFY__*`
//! environment variables into a validated [`NotifyConfig`].

use super::error::{ConfigResult, ConfigurationError};
use super::NotifyConfig;
use crate::constants::env_vars;
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Loaded configuration plus where it came from
#[derive(Debug)]
pub struct ConfigManager {
    config: NotifyConfig,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration, honouring `STATE_NOTIFY_CONFIG_PATH` when set
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        let path = std::env::var(env_vars::CONFIG_PATH).ok().map(PathBuf::from);
        Self::load_from_path(path.as_deref())
    }

    /// Load configuration from an explicit file (or defaults + environment only)
    pub fn load_from_path(path: Option<&Path>) -> ConfigResult<Arc<ConfigManager>> {
        Self::load_with_environment(path, None)
    }

    /// Load configuration with an explicit environment variable map.
    ///
    /// Passing `Some(map)` replaces the process environment, which keeps tests
    /// independent of the global environment.
    pub fn load_with_environment(
        path: Option<&Path>,
        environment: Option<config::Map<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let defaults = Config::try_from(&NotifyConfig::default())
            .map_err(|e| ConfigurationError::load_error("defaults", e))?;

        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigurationError::config_file_not_found(path));
            }
            debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(env_vars::CONFIG_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(environment),
        );

        let merged = builder
            .build()
            .map_err(|e| ConfigurationError::load_error(Self::source_name(path), e))?;
        let config: NotifyConfig = merged.try_deserialize()?;
        config.validate()?;

        debug!(
            environment = %config.environment,
            default_delay_ms = config.delay.default_delay_ms,
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            source_path: path.map(Path::to_path_buf),
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &NotifyConfig {
        &self.config
    }

    /// File the configuration was read from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    fn source_name(path: Option<&Path>) -> String {
        path.map(|p| p.display().to_string())
            .unwrap_or_else(|| "environment".to_string())
    }
}
