//! Prompt completion over text and vision providers

use crate::config::AppConfig;
use crate::constants::COMPLETION_PIPELINE;
use crate::pipeline::{BackoffPolicy, ExecutionPipeline, ProviderCall, ProviderRouting};
use arbiter_domain::error::Result;
use arbiter_domain::ports::{Completion, CompletionProvider, CompletionRequest};
use arbiter_domain::value_objects::{Capability, ExecutionResult, RequestDescriptor};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Completes prompts using the best available completion provider
pub struct CompletionService {
    pipeline: ExecutionPipeline<dyn CompletionProvider>,
}

impl CompletionService {
    pub fn new(pipeline: ExecutionPipeline<dyn CompletionProvider>) -> Self {
        Self { pipeline }
    }

    /// Build the service from the `completion` pipeline section
    pub fn from_config(
        routing: ProviderRouting<dyn CompletionProvider>,
        config: &AppConfig,
    ) -> Result<Self> {
        let pipeline = ExecutionPipeline::new(
            COMPLETION_PIPELINE,
            routing,
            config.pipeline(COMPLETION_PIPELINE),
            BackoffPolicy::from(&config.retry),
        )?;
        Ok(Self::new(pipeline))
    }

    pub fn pipeline(&self) -> &ExecutionPipeline<dyn CompletionProvider> {
        &self.pipeline
    }

    /// Selection view of a prompt
    pub fn describe(prompt: &CompletionRequest) -> RequestDescriptor {
        let mut request =
            RequestDescriptor::new("complete").with_payload_bytes(prompt.payload_bytes());
        if prompt.image.is_some() {
            request = request.require(Capability::Vision);
        }
        if prompt.structured_output {
            request = request.require(Capability::StructuredOutput);
        }
        request
    }

    /// Complete `prompt`
    pub async fn complete(
        &self,
        prompt: &CompletionRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult<Completion>> {
        let request = Self::describe(prompt);
        self.pipeline
            .execute(
                &request,
                cancel,
                |provider: Arc<dyn CompletionProvider>, call: ProviderCall| async move {
                    provider.complete(prompt, call.model.as_deref()).await
                },
            )
            .await
    }
}
