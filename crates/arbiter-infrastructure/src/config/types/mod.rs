//! Configuration types module

pub mod app;
pub mod cost;
pub mod health;
pub mod logging;
pub mod pipeline;
pub mod retry;
pub mod routing;

// Re-export main types
pub use app::AppConfig;
pub use cost::CostConfig;
pub use health::HealthConfig;
pub use logging::LoggingConfig;
pub use pipeline::PipelineConfig;
pub use retry::RetryConfig;
pub use routing::RoutingConfig;
