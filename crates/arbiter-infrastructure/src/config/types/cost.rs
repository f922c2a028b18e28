//! Cost accounting configuration types

use crate::constants::{COST_DEFAULT_WINDOW_SECS, COST_RETENTION_SECS};
use arbiter_domain::constants::{DEFAULT_SIZE_SURCHARGE_PER_MIB, SIZE_SURCHARGE_THRESHOLD_BYTES};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Cost analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostConfig {
    /// Payload size above which the size surcharge applies
    pub surcharge_threshold_bytes: u64,

    /// Surcharge per MiB beyond the threshold
    pub surcharge_per_mib: f64,

    /// Records older than this are pruned
    pub retention_secs: u64,

    /// Window used for budget checks and default reports
    pub default_window_secs: u64,

    /// Per-provider spending limits over the default window
    pub budgets: HashMap<String, f64>,
}

/// Returns default cost configuration with:
/// - 0.0001 per MiB beyond the first MiB
/// - 24 hour retention and a 1 hour reporting window
impl Default for CostConfig {
    fn default() -> Self {
        Self {
            surcharge_threshold_bytes: SIZE_SURCHARGE_THRESHOLD_BYTES,
            surcharge_per_mib: DEFAULT_SIZE_SURCHARGE_PER_MIB,
            retention_secs: COST_RETENTION_SECS,
            default_window_secs: COST_DEFAULT_WINDOW_SECS,
            budgets: HashMap::new(),
        }
    }
}

impl CostConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    pub fn default_window(&self) -> Duration {
        Duration::from_secs(self.default_window_secs)
    }
}
