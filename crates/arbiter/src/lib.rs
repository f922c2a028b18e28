//! # Arbiter
//!
//! Capability-aware selection over interchangeable AI completion and OCR
//! providers, with retry, exponential backoff and fallback.
//!
//! Callers issue a logical request ("extract text from this image") and
//! never see which backend served it. Providers are filtered by the
//! capabilities a request requires, ranked by the configured strategy,
//! and executed through a pipeline that records cost and health as it goes.
//!
//! ## Example
//!
//! ```ignore
//! use arbiter::infrastructure::{ConfigLoader, ProviderRouting, TextExtractionService};
//!
//! let config = ConfigLoader::new().load()?;
//! let routing = ProviderRouting::from_providers(ocr_providers, &config)?;
//! let service = TextExtractionService::from_config(routing, &config)?;
//!
//! match service.extract_text(&image, &CancellationToken::new()).await? {
//!     ExecutionResult::Success(output) => println!("{}", output.text),
//!     ExecutionResult::Failure(errors) => eprintln!("{}", errors.join("; ")),
//! }
//! ```
//!
//! ## Architecture
//!
//! - `domain` - Capability model, value objects, ports and the error type
//! - `infrastructure` - Config, logging, routing, pipelines and task services

/// Domain layer - capability model, ports and errors
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use arbiter_domain::*;
}

/// Infrastructure layer - routing, execution and configuration
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use arbiter_infrastructure::*;
}

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export the main entry points
pub use infrastructure::{
    AppConfig, CompletionService, ConfigLoader, ExecutionPipeline, TextExtractionService,
};
