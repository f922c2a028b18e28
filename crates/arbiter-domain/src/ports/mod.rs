//! Port traits
//!
//! Contracts between the routing core and its collaborators.
//!
//! - [`providers`] - the adapter contract every external backend implements
//! - [`routing`] - selection, ranking and cost-accounting services

pub mod providers;
pub mod routing;

pub use providers::{
    Completion, CompletionProvider, CompletionRequest, ImageInput, OcrOutput, OcrProvider,
    ProviderAdapter,
};
pub use routing::{CostAnalyzer, ProviderSelector, RankingStrategy};
