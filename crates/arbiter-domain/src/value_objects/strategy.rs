//! Selection strategy configuration

use crate::constants::{BALANCED_COST_WEIGHT, BALANCED_RELIABILITY_WEIGHT, BALANCED_SPEED_WEIGHT};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy used to rank eligible providers
///
/// Read at selection time; never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Cheapest `cost_per_request` first
    #[default]
    CostOptimized,
    /// Fastest `average_response_time` first
    PerformanceOptimized,
    /// Most matched preferred capabilities first, then reliability
    CapabilityOptimized,
    /// Highest reported reliability first
    ReliabilityOptimized,
    /// Weighted composite of speed, cost and reliability
    Balanced,
    /// An explicitly named provider, no scoring
    Configuration {
        /// Name of the provider to use
        provider: String,
    },
}

impl SelectionStrategy {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::CostOptimized => "cost_optimized",
            Self::PerformanceOptimized => "performance_optimized",
            Self::CapabilityOptimized => "capability_optimized",
            Self::ReliabilityOptimized => "reliability_optimized",
            Self::Balanced => "balanced",
            Self::Configuration { .. } => "configuration",
        }
    }
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration { provider } => write!(f, "configuration({provider})"),
            other => f.write_str(other.name()),
        }
    }
}

/// Weights of the balanced composite score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancedWeights {
    pub speed: f64,
    pub cost: f64,
    pub reliability: f64,
}

impl Default for BalancedWeights {
    fn default() -> Self {
        Self {
            speed: BALANCED_SPEED_WEIGHT,
            cost: BALANCED_COST_WEIGHT,
            reliability: BALANCED_RELIABILITY_WEIGHT,
        }
    }
}

impl BalancedWeights {
    /// Weights must be finite, non-negative and not all zero
    pub fn validate(&self) -> Result<()> {
        let weights = [self.speed, self.cost, self.reliability];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::configuration(format!(
                "balanced weights must be non-negative numbers, got {self:?}"
            )));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(Error::configuration("balanced weights cannot all be zero"));
        }
        Ok(())
    }
}
