//! Routing configuration types

use arbiter_domain::value_objects::{BalancedWeights, SelectionStrategy};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provider selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Active selection strategy
    pub strategy: SelectionStrategy,

    /// Weights used when `strategy` is balanced
    pub balanced_weights: BalancedWeights,

    /// Also skip providers whose latest health snapshot is unhealthy
    pub exclude_unhealthy: bool,

    /// Extra alias → canonical provider name entries
    pub aliases: HashMap<String, String>,
}
