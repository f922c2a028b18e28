//! Provider Routing Infrastructure
//!
//! Selection of interchangeable backends based on capabilities, cost,
//! latency, reliability and health.
//!
//! ## Components
//!
//! - [`ProviderRegistry`] - Ordered provider set with layered name resolution
//! - [`AliasTable`] - Common aliases mapped to canonical provider names
//! - [`strategies`] - One ranking implementation per selection strategy
//! - [`DefaultProviderSelector`] - Capability filtering plus strategy ranking
//! - [`DefaultCostAnalyzer`] - Cost estimation and time-windowed ledger
//! - [`HealthTracker`] - Latest health snapshot per provider
//!
//! ## Usage
//!
//! ```ignore
//! let registry = Arc::new(ProviderRegistry::from_providers(providers, AliasTable::new())?);
//! let health = Arc::new(HealthTracker::new(&config.health));
//! let selector = DefaultProviderSelector::new(registry, health, &config.routing);
//! let provider = selector.select_best_provider(&request).await?;
//! ```

mod cost;
mod health;
mod registry;
mod selector;
pub mod strategies;

pub use cost::DefaultCostAnalyzer;
pub use health::HealthTracker;
pub use registry::{AliasTable, ProviderRegistry};
pub use selector::DefaultProviderSelector;
pub use strategies::StrategyRanking;
