//! Resilient execution
//!
//! Resolve a primary provider, attempt it with bounded retries and
//! exponential backoff, then try a configured fallback once.

mod backoff;
mod execution;
mod routing;

pub use backoff::BackoffPolicy;
pub use execution::{ExecutionPipeline, ProviderCall};
pub use routing::ProviderRouting;
