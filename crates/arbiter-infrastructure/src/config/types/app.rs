//! Main application configuration

use super::{CostConfig, HealthConfig, LoggingConfig, PipelineConfig, RetryConfig, RoutingConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Provider selection configuration
    pub routing: RoutingConfig,

    /// Cost analyzer configuration
    pub cost: CostConfig,

    /// Health tracker configuration
    pub health: HealthConfig,

    /// Backoff between retries
    pub retry: RetryConfig,

    /// Named pipeline configurations
    pub pipelines: HashMap<String, PipelineConfig>,
}

impl AppConfig {
    /// Configuration of the named pipeline, or the default when absent
    pub fn pipeline(&self, name: &str) -> PipelineConfig {
        self.pipelines.get(name).cloned().unwrap_or_default()
    }
}
