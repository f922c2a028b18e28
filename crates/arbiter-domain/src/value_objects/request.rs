//! Request descriptors

use super::capabilities::Capability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The caller's logical ask, as seen by provider selection
///
/// Carries hard capability requirements, soft preferences and a payload
/// size hint for cost and latency estimation. Never mutated once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Logical operation name (e.g. "extract_text", "complete")
    pub operation: String,
    /// Capabilities every candidate must support
    pub required: BTreeSet<Capability>,
    /// Capabilities that rank a candidate higher when supported
    pub preferred: BTreeSet<Capability>,
    /// Payload size in bytes
    pub payload_bytes: u64,
}

impl RequestDescriptor {
    /// Create a descriptor for the named operation
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            ..Default::default()
        }
    }

    /// Add a hard requirement
    pub fn require(mut self, capability: Capability) -> Self {
        self.required.insert(capability);
        self
    }

    /// Add a soft preference
    pub fn prefer(mut self, capability: Capability) -> Self {
        self.preferred.insert(capability);
        self
    }

    /// Set the payload size hint
    pub fn with_payload_bytes(mut self, bytes: u64) -> Self {
        self.payload_bytes = bytes;
        self
    }

    /// Whether the request carries any hard requirement
    pub fn has_requirements(&self) -> bool {
        !self.required.is_empty()
    }
}
