//! # Arbiter Domain
//!
//! Core types and port traits for provider selection and resilient execution.
//!
//! This crate has no knowledge of how providers are reached. It defines:
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`constants`] | Tuning defaults (cost surcharge, balanced weights, retries) |
//! | [`value_objects`] | Capabilities, requests, cost records, health snapshots, results |
//! | [`ports`] | Provider adapter contract and routing service interfaces |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types
pub use error::{Error, Result};
pub use value_objects::{
    BalancedWeights, Capability, CostBreakdown, CostRecord, CostReport, ExecutionResult,
    HealthStatus, ProviderCapabilities, ProviderFeatures, ProviderProfile, RequestDescriptor,
    SelectionStrategy,
};
