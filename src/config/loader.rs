//! Configuration Loader
//!
//! Environment-aware configuration loading: YAML file discovery, environment
//! detection, environment-variable overrides, and validation.

use super::error::{ConfigResult, ConfigurationError};
use super::ModelCacheConfig;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Loaded configuration plus the context it was loaded in
#[derive(Debug)]
pub struct ConfigManager {
    config: ModelCacheConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Arc<ConfigManager>> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with explicit environment
    /// This is useful for testing without modifying global environment variables
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let config_directory = config_dir.unwrap_or_else(|| PathBuf::from("config"));

        debug!(
            "Loading configuration for environment '{}' from directory: {}",
            environment,
            config_directory.display()
        );

        let config_file = Self::find_config_file(&config_directory, environment)?;

        let raw = std::fs::read_to_string(&config_file)
            .map_err(|e| ConfigurationError::file_read_error(config_file.display().to_string(), e))?;

        let mut config: ModelCacheConfig = serde_yaml::from_str(&raw)
            .map_err(|e| ConfigurationError::invalid_yaml(config_file.display().to_string(), e))?;

        Self::apply_env_overrides(&mut config)?;

        config.validate()?;

        crate::log_config!(info, "Configuration loaded successfully",
            environment: environment,
            config_file: config_file.display().to_string(),
            policy_count: config.policies.len(),
            degrade_on_failure: config.degrade_on_failure
        );

        Ok(Arc::new(ConfigManager {
            config,
            environment: environment.to_string(),
            config_directory,
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ModelCacheConfig {
        &self.config
    }

    /// Get the current environment
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Get the configuration directory
    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }

    /// Detect current environment from environment variables
    fn detect_environment() -> String {
        env::var("MODELCACHE_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
    }

    /// Find the configuration file for an environment.
    ///
    /// `modelcache-{environment}.yaml` wins over the base `modelcache.yaml`.
    fn find_config_file(config_dir: &Path, environment: &str) -> ConfigResult<PathBuf> {
        let candidates = [
            config_dir.join(format!("modelcache-{environment}.yaml")),
            config_dir.join("modelcache.yaml"),
        ];

        candidates
            .iter()
            .find(|path| path.is_file())
            .cloned()
            .ok_or_else(|| ConfigurationError::config_file_not_found(candidates.to_vec()))
    }

    /// Apply environment variable overrides to the loaded configuration
    fn apply_env_overrides(config: &mut ModelCacheConfig) -> ConfigResult<()> {
        if let Ok(value) = env::var("MODELCACHE_DEGRADE_ON_FAILURE") {
            config.degrade_on_failure = value.trim().to_lowercase().parse().map_err(|_| {
                ConfigurationError::environment_override_error(
                    "MODELCACHE_DEGRADE_ON_FAILURE",
                    format!("expected true or false, got '{value}'"),
                )
            })?;
            debug!(
                degrade_on_failure = config.degrade_on_failure,
                "Degradation flag overridden from environment"
            );
        }

        if let Ok(url) = env::var("MODELCACHE_REDIS_URL") {
            if url.trim().is_empty() {
                return Err(ConfigurationError::environment_override_error(
                    "MODELCACHE_REDIS_URL",
                    "override value is empty",
                ));
            }
            config.redis.url = url;
            debug!("Redis URL overridden from environment");
        }

        Ok(())
    }
}
