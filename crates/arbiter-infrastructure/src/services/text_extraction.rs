//! Text extraction over OCR providers

use crate::config::AppConfig;
use crate::constants::TEXT_EXTRACTION_PIPELINE;
use crate::pipeline::{BackoffPolicy, ExecutionPipeline, ProviderCall, ProviderRouting};
use arbiter_domain::error::Result;
use arbiter_domain::ports::{ImageInput, OcrOutput, OcrProvider};
use arbiter_domain::value_objects::{Capability, ExecutionResult, RequestDescriptor};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Extracts text from images using the best available OCR provider
pub struct TextExtractionService {
    pipeline: ExecutionPipeline<dyn OcrProvider>,
}

impl TextExtractionService {
    pub fn new(pipeline: ExecutionPipeline<dyn OcrProvider>) -> Self {
        Self { pipeline }
    }

    /// Build the service from the `text_extraction` pipeline section
    pub fn from_config(
        routing: ProviderRouting<dyn OcrProvider>,
        config: &AppConfig,
    ) -> Result<Self> {
        let pipeline = ExecutionPipeline::new(
            TEXT_EXTRACTION_PIPELINE,
            routing,
            config.pipeline(TEXT_EXTRACTION_PIPELINE),
            BackoffPolicy::from(&config.retry),
        )?;
        Ok(Self::new(pipeline))
    }

    pub fn pipeline(&self) -> &ExecutionPipeline<dyn OcrProvider> {
        &self.pipeline
    }

    /// Selection view of an image
    ///
    /// Handwriting is a hard requirement; language detection is preferred
    /// when no language hint is given.
    pub fn describe(image: &ImageInput) -> RequestDescriptor {
        let mut request =
            RequestDescriptor::new("extract_text").with_payload_bytes(image.bytes.len() as u64);
        if image.handwriting {
            request = request.require(Capability::Handwriting);
        }
        if image.language_hint.is_none() {
            request = request.prefer(Capability::LanguageDetection);
        }
        request
    }

    /// Extract text from `image`
    pub async fn extract_text(
        &self,
        image: &ImageInput,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult<OcrOutput>> {
        let request = Self::describe(image);
        self.pipeline
            .execute(
                &request,
                cancel,
                |provider: Arc<dyn OcrProvider>, call: ProviderCall| async move {
                    provider.extract_text(image, call.model.as_deref()).await
                },
            )
            .await
    }
}
