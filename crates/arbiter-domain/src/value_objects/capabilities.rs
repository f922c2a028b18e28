//! Provider capability descriptors
//!
//! Static facts a provider publishes about itself: features, cost, latency
//! and limits. Selection treats required capabilities as hard constraints.

use crate::constants::BYTES_PER_MIB;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// A named optional feature a provider may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Detects the language of the input
    LanguageDetection,
    /// Recognizes handwritten text
    Handwriting,
    /// Streams partial output
    Streaming,
    /// Accepts caller-supplied model identifiers
    CustomModels,
    /// Accepts image input
    Vision,
    /// Extracts tabular layouts
    TableExtraction,
    /// Produces schema-constrained output
    StructuredOutput,
}

impl Capability {
    /// Every capability, in declaration order
    pub const ALL: [Capability; 7] = [
        Capability::LanguageDetection,
        Capability::Handwriting,
        Capability::Streaming,
        Capability::CustomModels,
        Capability::Vision,
        Capability::TableExtraction,
        Capability::StructuredOutput,
    ];

    /// snake_case name, matching the serialized form
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LanguageDetection => "language_detection",
            Self::Handwriting => "handwriting",
            Self::Streaming => "streaming",
            Self::CustomModels => "custom_models",
            Self::Vision => "vision",
            Self::TableExtraction => "table_extraction",
            Self::StructuredOutput => "structured_output",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independent feature flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderFeatures {
    pub language_detection: bool,
    pub handwriting: bool,
    pub streaming: bool,
    pub custom_models: bool,
    pub vision: bool,
    pub table_extraction: bool,
    pub structured_output: bool,
}

impl ProviderFeatures {
    /// Whether the flag for `capability` is set
    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::LanguageDetection => self.language_detection,
            Capability::Handwriting => self.handwriting,
            Capability::Streaming => self.streaming,
            Capability::CustomModels => self.custom_models,
            Capability::Vision => self.vision,
            Capability::TableExtraction => self.table_extraction,
            Capability::StructuredOutput => self.structured_output,
        }
    }

    /// Set the flag for `capability`
    pub fn with(mut self, capability: Capability) -> Self {
        match capability {
            Capability::LanguageDetection => self.language_detection = true,
            Capability::Handwriting => self.handwriting = true,
            Capability::Streaming => self.streaming = true,
            Capability::CustomModels => self.custom_models = true,
            Capability::Vision => self.vision = true,
            Capability::TableExtraction => self.table_extraction = true,
            Capability::StructuredOutput => self.structured_output = true,
        }
        self
    }

    /// The set flags as capabilities
    pub fn to_set(&self) -> BTreeSet<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.has(*c))
            .collect()
    }
}

impl FromIterator<Capability> for ProviderFeatures {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |features, c| features.with(c))
    }
}

/// Capability descriptor for one provider
///
/// Effectively immutable once a provider is constructed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderCapabilities {
    /// Supported optional features
    pub features: ProviderFeatures,
    /// Flat cost of one request, in currency units
    pub cost_per_request: f64,
    /// Cost per unit of input (token or byte)
    pub cost_per_input_unit: f64,
    /// Typical response time
    #[serde(with = "duration_millis")]
    pub average_response_time: Duration,
    /// Largest accepted input, in bytes
    pub max_input_bytes: Option<u64>,
    /// Requests accepted per minute
    pub max_requests_per_minute: Option<u32>,
    /// Requests accepted per day
    pub max_requests_per_day: Option<u32>,
    /// Whether calls leave the local host
    pub requires_internet: bool,
}

impl ProviderCapabilities {
    /// Create a descriptor with a flat request cost and typical latency
    pub fn new(cost_per_request: f64, average_response_time: Duration) -> Self {
        Self {
            cost_per_request,
            average_response_time,
            ..Default::default()
        }
    }

    /// Set the feature flags
    pub fn with_features(mut self, features: ProviderFeatures) -> Self {
        self.features = features;
        self
    }

    /// Add a single feature flag
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.features = self.features.with(capability);
        self
    }

    /// Set the per-unit input cost
    pub fn with_cost_per_input_unit(mut self, cost: f64) -> Self {
        self.cost_per_input_unit = cost;
        self
    }

    /// Set the maximum input size
    pub fn with_max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = Some(bytes);
        self
    }

    /// Set request rate limits
    pub fn with_rate_limits(mut self, per_minute: Option<u32>, per_day: Option<u32>) -> Self {
        self.max_requests_per_minute = per_minute;
        self.max_requests_per_day = per_day;
        self
    }

    /// Mark the provider as requiring internet access
    pub fn with_internet(mut self, requires_internet: bool) -> Self {
        self.requires_internet = requires_internet;
        self
    }

    /// Whether the provider supports `capability`
    pub fn supports(&self, capability: Capability) -> bool {
        self.features.has(capability)
    }

    /// Whether every capability in `required` is supported
    pub fn satisfies(&self, required: &BTreeSet<Capability>) -> bool {
        required.iter().all(|c| self.supports(*c))
    }

    /// How many of `wanted` are supported
    pub fn matched_count(&self, wanted: &BTreeSet<Capability>) -> usize {
        wanted.iter().filter(|c| self.supports(**c)).count()
    }

    /// Whether a payload of `bytes` fits the declared input limit
    pub fn accepts_input(&self, bytes: u64) -> bool {
        self.max_input_bytes.is_none_or(|max| bytes <= max)
    }

    /// Tiered cost estimate for a payload of `payload_bytes`
    ///
    /// The flat request cost, plus `surcharge_per_mib` for every MiB beyond
    /// `threshold_bytes`. Payloads at or below the threshold pay no surcharge.
    pub fn estimate_cost(
        &self,
        payload_bytes: u64,
        threshold_bytes: u64,
        surcharge_per_mib: f64,
    ) -> f64 {
        let base = self.cost_per_request;
        if payload_bytes <= threshold_bytes {
            return base;
        }
        let size_mib = payload_bytes as f64 / BYTES_PER_MIB as f64;
        let threshold_mib = threshold_bytes as f64 / BYTES_PER_MIB as f64;
        base + (size_mib - threshold_mib) * surcharge_per_mib
    }

    /// Check the non-negative cost invariant
    pub fn validate(&self) -> Result<()> {
        if !self.cost_per_request.is_finite() || self.cost_per_request < 0.0 {
            return Err(Error::configuration(format!(
                "cost_per_request must be a non-negative number, got {}",
                self.cost_per_request
            )));
        }
        if !self.cost_per_input_unit.is_finite() || self.cost_per_input_unit < 0.0 {
            return Err(Error::configuration(format!(
                "cost_per_input_unit must be a non-negative number, got {}",
                self.cost_per_input_unit
            )));
        }
        Ok(())
    }
}

/// Snapshot of a registered provider as seen by ranking strategies
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    /// Canonical provider name
    pub name: String,
    /// Registration position, used to break ties
    pub order: usize,
    /// Provider capabilities
    pub capabilities: ProviderCapabilities,
    /// Reported reliability in `[0.0, 1.0]`
    pub reliability: f64,
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
