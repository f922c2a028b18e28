//! Provider health snapshots

use crate::constants::PROVIDER_NOT_FOUND_STATUS;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Latest liveness result for one provider
///
/// Overwritten on every check; no history is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub provider: String,
    pub healthy: bool,
    pub status: String,
    pub response_time: Option<Duration>,
    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    /// Creates a healthy snapshot
    pub fn healthy(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            healthy: true,
            status: "Healthy".to_string(),
            response_time: None,
            checked_at: Utc::now(),
        }
    }

    /// Creates an unhealthy snapshot with the given status text
    pub fn unhealthy(provider: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            healthy: false,
            status: status.into(),
            response_time: None,
            checked_at: Utc::now(),
        }
    }

    /// Snapshot returned for names that match no registered provider
    pub fn not_found(provider: impl Into<String>) -> Self {
        Self::unhealthy(provider, PROVIDER_NOT_FOUND_STATUS)
    }

    /// Sets the measured response time
    pub fn with_response_time(mut self, response_time: Duration) -> Self {
        self.response_time = Some(response_time);
        self
    }

    /// Replaces the status text
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Overrides the check timestamp
    pub fn checked_at(mut self, at: DateTime<Utc>) -> Self {
        self.checked_at = at;
        self
    }

    /// Age of the snapshot relative to `now`
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.checked_at).to_std().unwrap_or_default()
    }
}
