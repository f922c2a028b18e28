//! Caller-facing task services
//!
//! Each service turns a task input into a [`RequestDescriptor`] and runs
//! one [`ExecutionPipeline`]. Callers never see which provider served them.
//!
//! [`RequestDescriptor`]: arbiter_domain::value_objects::RequestDescriptor
//! [`ExecutionPipeline`]: crate::pipeline::ExecutionPipeline

mod completion;
mod text_extraction;

pub use completion::CompletionService;
pub use text_extraction::TextExtractionService;
