//! Health tracking configuration types

use crate::constants::{HEALTH_CHECK_TIMEOUT_SECS, HEALTH_TTL_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health tracker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Freshness of a cached snapshot
    pub ttl_secs: u64,

    /// Time budget of one live check
    pub check_timeout_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            ttl_secs: HEALTH_TTL_SECS,
            check_timeout_secs: HEALTH_CHECK_TIMEOUT_SECS,
        }
    }
}

impl HealthConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }
}
