//! Value objects
//!
//! Immutable data exchanged between the selector, the cost analyzer, the
//! health tracker and the execution pipeline.

pub mod capabilities;
pub mod cost;
pub mod execution;
pub mod health;
pub mod request;
pub mod strategy;

pub use capabilities::{Capability, ProviderCapabilities, ProviderFeatures, ProviderProfile};
pub use cost::{CostBreakdown, CostRecord, CostReport};
pub use execution::ExecutionResult;
pub use health::HealthStatus;
pub use request::RequestDescriptor;
pub use strategy::{BalancedWeights, SelectionStrategy};
