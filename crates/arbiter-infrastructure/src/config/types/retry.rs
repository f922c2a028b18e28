//! Retry backoff configuration types

use crate::constants::{RETRY_BASE_DELAY_MS, RETRY_MAX_DELAY_MS};
use serde::{Deserialize, Serialize};

/// Exponential backoff configuration
///
/// Retry `n` waits `base_delay_ms * 2^(n-1)`, capped at `max_delay_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Delay before the first retry
    pub base_delay_ms: u64,

    /// Upper bound on a single wait
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: RETRY_BASE_DELAY_MS,
            max_delay_ms: RETRY_MAX_DELAY_MS,
        }
    }
}
