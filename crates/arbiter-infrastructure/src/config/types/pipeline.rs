//! Pipeline configuration types

use arbiter_domain::constants::{DEFAULT_MAX_RETRIES, MAX_RETRIES_LIMIT};
use arbiter_domain::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of one logical pipeline
///
/// Read once when the pipeline is built and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Primary provider name; `None` or empty lets the selector decide
    pub primary_provider: Option<String>,

    /// Model override for the primary provider
    pub model: Option<String>,

    /// Provider tried once the primary's retries are exhausted
    pub fallback_provider: Option<String>,

    /// Model override for the fallback provider
    pub fallback_model: Option<String>,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Per-attempt time budget
    pub timeout_secs: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            primary_provider: None,
            model: None,
            fallback_provider: None,
            fallback_model: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_primary(mut self, provider: impl Into<String>) -> Self {
        self.primary_provider = Some(provider.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_fallback(mut self, provider: impl Into<String>) -> Self {
        self.fallback_provider = Some(provider.into());
        self
    }

    pub fn with_fallback_model(mut self, model: impl Into<String>) -> Self {
        self.fallback_model = Some(model.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Configured primary name, treating blank strings as unset
    pub fn primary(&self) -> Option<&str> {
        non_blank(self.primary_provider.as_deref())
    }

    /// Configured fallback name, treating blank strings as unset
    pub fn fallback(&self) -> Option<&str> {
        non_blank(self.fallback_provider.as_deref())
    }

    /// Per-attempt timeout, if any
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Total attempts against one provider
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Structural validation, run before a pipeline is built
    pub fn validate(&self) -> Result<()> {
        if self.max_retries > MAX_RETRIES_LIMIT {
            return Err(Error::configuration(format!(
                "max_retries must be at most {MAX_RETRIES_LIMIT}, got {}",
                self.max_retries
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::configuration("timeout_secs cannot be 0"));
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
