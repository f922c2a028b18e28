//! Provider adapter contract
//!
//! Concrete vendor integrations live outside the core and implement
//! [`ProviderAdapter`] plus one task trait ([`OcrProvider`],
//! [`CompletionProvider`]). The core never depends on adapter internals.

use crate::constants::{
    DEFAULT_RELIABILITY_SCORE, DEFAULT_SIZE_SURCHARGE_PER_MIB, SIZE_SURCHARGE_THRESHOLD_BYTES,
};
use crate::error::Result;
use crate::value_objects::{HealthStatus, ProviderCapabilities, ProviderProfile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Common contract of every interchangeable backend
///
/// # Example
///
/// ```ignore
/// let provider: Arc<dyn OcrProvider> = Arc::new(TesseractAdapter::new(config));
///
/// if provider.is_available() {
///     let health = provider.check_health().await;
///     println!("{}: {}", provider.provider_name(), health.status);
/// }
/// ```
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Unique identity within a registry
    fn provider_name(&self) -> &str;

    /// Static capability descriptor
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Whether calls leave the local host
    fn requires_internet(&self) -> bool {
        self.capabilities().requires_internet
    }

    /// Cheap local availability check (credentials present, binary found, ...)
    fn is_available(&self) -> bool;

    /// Reliability in `[0.0, 1.0]` used by reliability-aware ranking
    fn reliability_score(&self) -> f64 {
        DEFAULT_RELIABILITY_SCORE
    }

    /// Live health check; may perform a network call
    async fn check_health(&self) -> HealthStatus;

    /// Estimated cost of a call with a payload of `payload_bytes`
    fn estimate_cost(&self, payload_bytes: u64) -> f64 {
        self.capabilities().estimate_cost(
            payload_bytes,
            SIZE_SURCHARGE_THRESHOLD_BYTES,
            DEFAULT_SIZE_SURCHARGE_PER_MIB,
        )
    }

    /// Snapshot used by ranking strategies
    fn profile(&self, order: usize) -> ProviderProfile {
        ProviderProfile {
            name: self.provider_name().to_string(),
            order,
            capabilities: self.capabilities().clone(),
            reliability: self.reliability_score().clamp(0.0, 1.0),
        }
    }
}

/// Image handed to an OCR backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// MIME type of `bytes` (e.g. "image/png")
    pub mime_type: String,
    /// The image contains handwriting
    pub handwriting: bool,
    /// Expected language, if known
    pub language_hint: Option<String>,
}

impl ImageInput {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            ..Default::default()
        }
    }

    pub fn with_handwriting(mut self, handwriting: bool) -> Self {
        self.handwriting = handwriting;
        self
    }

    pub fn with_language_hint(mut self, language: impl Into<String>) -> Self {
        self.language_hint = Some(language.into());
        self
    }
}

/// Text extracted by an OCR backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrOutput {
    pub text: String,
    pub confidence: Option<f32>,
    pub detected_language: Option<String>,
}

/// Optical character recognition backend
#[async_trait]
pub trait OcrProvider: ProviderAdapter {
    /// Extract text from an image
    async fn extract_text(&self, image: &ImageInput, model: Option<&str>) -> Result<OcrOutput>;
}

/// Prompt handed to a text or vision completion backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system: Option<String>,
    /// Optional image for vision-capable models
    pub image: Option<ImageInput>,
    pub max_tokens: Option<u32>,
    /// Ask for schema-constrained (JSON) output
    pub structured_output: bool,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_image(mut self, image: ImageInput) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_structured_output(mut self, structured: bool) -> Self {
        self.structured_output = structured;
        self
    }

    /// Approximate payload size used for cost estimation
    pub fn payload_bytes(&self) -> u64 {
        let text = self.prompt.len() + self.system.as_ref().map_or(0, String::len);
        let image = self.image.as_ref().map_or(0, |i| i.bytes.len());
        (text + image) as u64
    }
}

/// Completion returned by a backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub text: String,
    /// Model that produced the text, if reported
    pub model: Option<String>,
}

/// Text or vision completion backend
#[async_trait]
pub trait CompletionProvider: ProviderAdapter {
    /// Complete a prompt, optionally overriding the backend's default model
    async fn complete(&self, request: &CompletionRequest, model: Option<&str>) -> Result<Completion>;
}
