//! Configuration
//!
//! Typed configuration sections and the figment-based loader.

pub mod loader;
pub mod types;

pub use loader::{ConfigBuilder, ConfigLoader};
pub use types::{
    AppConfig, CostConfig, HealthConfig, LoggingConfig, PipelineConfig, RetryConfig,
    RoutingConfig,
};
