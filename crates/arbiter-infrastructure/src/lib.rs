//! # Infrastructure Layer
//!
//! Provider selection, cost accounting, health tracking and resilient
//! execution built on the ports defined in `arbiter-domain`.
//!
//! ## Module Categories
//!
//! ### Configuration
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | TOML + environment configuration via figment |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//!
//! ### Routing & Selection
//! | Module | Description |
//! |--------|-------------|
//! | [`routing`] | Registry, ranking strategies, selector, cost and health tracking |
//!
//! ### Execution
//! | Module | Description |
//! |--------|-------------|
//! | [`pipeline`] | Retry with exponential backoff, then fallback |
//! | [`services`] | Caller-facing task services (text extraction, completion) |

pub mod config;
pub mod constants;
pub mod error_ext;
pub mod logging;
pub mod pipeline;
pub mod routing;
pub mod services;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader, PipelineConfig};
pub use error_ext::ErrorContext;
pub use pipeline::{BackoffPolicy, ExecutionPipeline, ProviderCall, ProviderRouting};
pub use routing::{
    AliasTable, DefaultCostAnalyzer, DefaultProviderSelector, HealthTracker, ProviderRegistry,
    StrategyRanking,
};
pub use services::{CompletionService, TextExtractionService};
