//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.
//!
//! Uses Figment for configuration management.

use crate::config::{AppConfig, CostConfig, LoggingConfig, PipelineConfig, RoutingConfig};
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use arbiter_domain::error::{Error, Result};
use arbiter_domain::value_objects::SelectionStrategy;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,

    /// Environment prefix
    env_prefix: String,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self {
            config_path: None,
            env_prefix: CONFIG_ENV_PREFIX.to_string(),
        }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix
    pub fn with_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `ARBITER__ROUTING__EXCLUDE_UNHEALTHY`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        let env_prefix = format!("{}{}", self.env_prefix, CONFIG_ENV_SEPARATOR);
        figment = figment.merge(Env::prefixed(&env_prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_logging_config(&config.logging)?;
    validate_routing_config(&config.routing)?;
    validate_cost_config(&config.cost)?;
    validate_health_config(config)?;
    validate_retry_config(config)?;
    for (name, pipeline) in &config.pipelines {
        pipeline.validate().map_err(|e| {
            Error::configuration(format!("Invalid pipeline '{name}': {e}"))
        })?;
    }
    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    parse_log_level(&config.level).map(|_| ())
}

fn validate_routing_config(config: &RoutingConfig) -> Result<()> {
    config.balanced_weights.validate()?;
    if let SelectionStrategy::Configuration { provider } = &config.strategy {
        if provider.trim().is_empty() {
            return Err(Error::configuration(
                "Configuration strategy requires a provider name",
            ));
        }
    }
    Ok(())
}

fn validate_cost_config(config: &CostConfig) -> Result<()> {
    if !config.surcharge_per_mib.is_finite() || config.surcharge_per_mib < 0.0 {
        return Err(Error::configuration(format!(
            "surcharge_per_mib must be non-negative, got {}",
            config.surcharge_per_mib
        )));
    }
    if config.retention_secs == 0 {
        return Err(Error::configuration("Cost retention cannot be 0"));
    }
    if config.default_window_secs == 0 {
        return Err(Error::configuration("Cost reporting window cannot be 0"));
    }
    if config.default_window_secs > config.retention_secs {
        return Err(Error::configuration(format!(
            "Cost reporting window ({}s) cannot exceed retention ({}s)",
            config.default_window_secs, config.retention_secs
        )));
    }
    if let Some((provider, budget)) = config
        .budgets
        .iter()
        .find(|(_, b)| !b.is_finite() || **b < 0.0)
    {
        return Err(Error::configuration(format!(
            "Budget for '{provider}' must be non-negative, got {budget}"
        )));
    }
    Ok(())
}

fn validate_health_config(config: &AppConfig) -> Result<()> {
    if config.health.ttl_secs == 0 {
        return Err(Error::configuration("Health snapshot TTL cannot be 0"));
    }
    if config.health.check_timeout_secs == 0 {
        return Err(Error::configuration("Health check timeout cannot be 0"));
    }
    Ok(())
}

fn validate_retry_config(config: &AppConfig) -> Result<()> {
    if config.retry.base_delay_ms == 0 {
        return Err(Error::configuration("Retry base delay cannot be 0"));
    }
    if config.retry.max_delay_ms < config.retry.base_delay_ms {
        return Err(Error::configuration(
            "Retry max delay cannot be smaller than the base delay",
        ));
    }
    Ok(())
}

/// Configuration builder for programmatic configuration
pub struct ConfigBuilder {
    config: AppConfig,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Set logging configuration
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.config.logging = logging;
        self
    }

    /// Set the selection strategy
    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.config.routing.strategy = strategy;
        self
    }

    /// Set routing configuration
    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.config.routing = routing;
        self
    }

    /// Set cost configuration
    pub fn with_cost(mut self, cost: CostConfig) -> Self {
        self.config.cost = cost;
        self
    }

    /// Add a named pipeline
    pub fn with_pipeline(mut self, name: impl Into<String>, pipeline: PipelineConfig) -> Self {
        self.config.pipelines.insert(name.into(), pipeline);
        self
    }

    /// Build the configuration
    pub fn build(self) -> AppConfig {
        self.config
    }

    /// Build and validate the configuration
    pub fn try_build(self) -> Result<AppConfig> {
        validate_app_config(&self.config)?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
