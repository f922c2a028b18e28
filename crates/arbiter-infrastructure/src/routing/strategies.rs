//! Ranking strategies
//!
//! One [`RankingStrategy`] implementation per [`SelectionStrategy`] variant.
//! Candidates reaching a strategy already satisfy the request's hard
//! constraints. Every sort is stable, so equal candidates keep their
//! registration order.

use arbiter_domain::error::{Error, Result};
use arbiter_domain::ports::RankingStrategy;
use arbiter_domain::value_objects::{
    BalancedWeights, Capability, ProviderProfile, RequestDescriptor, SelectionStrategy,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Maps strategy configuration to its ranking implementation
pub trait StrategyRanking {
    /// Ranking implementation for this strategy
    fn ranking(&self, weights: BalancedWeights) -> Box<dyn RankingStrategy>;
}

impl StrategyRanking for SelectionStrategy {
    fn ranking(&self, weights: BalancedWeights) -> Box<dyn RankingStrategy> {
        match self {
            Self::CostOptimized => Box::new(CostOptimizedRanking),
            Self::PerformanceOptimized => Box::new(PerformanceOptimizedRanking),
            Self::CapabilityOptimized => Box::new(CapabilityOptimizedRanking),
            Self::ReliabilityOptimized => Box::new(ReliabilityOptimizedRanking),
            Self::Balanced => Box::new(BalancedRanking::new(weights)),
            Self::Configuration { provider } => Box::new(ConfiguredRanking::new(provider.clone())),
        }
    }
}

/// Cheapest `cost_per_request` first
#[derive(Debug, Clone, Copy, Default)]
pub struct CostOptimizedRanking;

impl RankingStrategy for CostOptimizedRanking {
    fn name(&self) -> &'static str {
        "cost_optimized"
    }

    fn rank(
        &self,
        mut candidates: Vec<ProviderProfile>,
        _request: &RequestDescriptor,
    ) -> Result<Vec<ProviderProfile>> {
        candidates.sort_by(|a, b| {
            a.capabilities
                .cost_per_request
                .total_cmp(&b.capabilities.cost_per_request)
        });
        Ok(candidates)
    }
}

/// Fastest `average_response_time` first
#[derive(Debug, Clone, Copy, Default)]
pub struct PerformanceOptimizedRanking;

impl RankingStrategy for PerformanceOptimizedRanking {
    fn name(&self) -> &'static str {
        "performance_optimized"
    }

    fn rank(
        &self,
        mut candidates: Vec<ProviderProfile>,
        _request: &RequestDescriptor,
    ) -> Result<Vec<ProviderProfile>> {
        candidates.sort_by_key(|p| p.capabilities.average_response_time);
        Ok(candidates)
    }
}

/// Most matched preferred capabilities first, then most reliable
///
/// Only preferences that are not already hard requirements count, since
/// every candidate satisfies the requirements.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityOptimizedRanking;

impl RankingStrategy for CapabilityOptimizedRanking {
    fn name(&self) -> &'static str {
        "capability_optimized"
    }

    fn rank(
        &self,
        mut candidates: Vec<ProviderProfile>,
        request: &RequestDescriptor,
    ) -> Result<Vec<ProviderProfile>> {
        let optional: BTreeSet<Capability> = request
            .preferred
            .difference(&request.required)
            .copied()
            .collect();

        candidates.sort_by(|a, b| {
            let matched_a = a.capabilities.matched_count(&optional);
            let matched_b = b.capabilities.matched_count(&optional);
            matched_b
                .cmp(&matched_a)
                .then_with(|| b.reliability.total_cmp(&a.reliability))
        });
        Ok(candidates)
    }
}

/// Highest reported reliability first
#[derive(Debug, Clone, Copy, Default)]
pub struct ReliabilityOptimizedRanking;

impl RankingStrategy for ReliabilityOptimizedRanking {
    fn name(&self) -> &'static str {
        "reliability_optimized"
    }

    fn rank(
        &self,
        mut candidates: Vec<ProviderProfile>,
        _request: &RequestDescriptor,
    ) -> Result<Vec<ProviderProfile>> {
        candidates.sort_by(|a, b| b.reliability.total_cmp(&a.reliability));
        Ok(candidates)
    }
}

/// Weighted composite of speed, cost and reliability
///
/// Each metric is min-max normalized to `[0, 1]` across the candidate set
/// before weighting, with speed and cost inverted so that faster and
/// cheaper score higher. A metric equal for every candidate scores 1.0.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalancedRanking {
    weights: BalancedWeights,
}

impl BalancedRanking {
    pub fn new(weights: BalancedWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> BalancedWeights {
        self.weights
    }

    /// Composite score of every candidate, in input order
    pub fn scores(&self, candidates: &[ProviderProfile]) -> Vec<f64> {
        let speed: Vec<f64> = candidates
            .iter()
            .map(|p| p.capabilities.average_response_time.as_secs_f64())
            .collect();
        let cost: Vec<f64> = candidates
            .iter()
            .map(|p| p.capabilities.cost_per_request)
            .collect();
        let reliability: Vec<f64> = candidates.iter().map(|p| p.reliability).collect();

        let speed = normalize(&speed, true);
        let cost = normalize(&cost, true);
        let reliability = normalize(&reliability, false);

        (0..candidates.len())
            .map(|i| {
                self.weights.speed * speed[i]
                    + self.weights.cost * cost[i]
                    + self.weights.reliability * reliability[i]
            })
            .collect()
    }
}

impl RankingStrategy for BalancedRanking {
    fn name(&self) -> &'static str {
        "balanced"
    }

    fn rank(
        &self,
        candidates: Vec<ProviderProfile>,
        _request: &RequestDescriptor,
    ) -> Result<Vec<ProviderProfile>> {
        let scores = self.scores(&candidates);
        let mut scored: Vec<(f64, ProviderProfile)> = scores.into_iter().zip(candidates).collect();
        scored.sort_by(|(a, _), (b, _)| b.total_cmp(a));
        Ok(scored.into_iter().map(|(_, profile)| profile).collect())
    }
}

/// Min-max normalization to `[0, 1]`; `invert` makes lower raw values score higher
fn normalize(values: &[f64], invert: bool) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values
        .iter()
        .map(|v| {
            if range.partial_cmp(&0.0) != Some(Ordering::Greater) {
                return 1.0;
            }
            let scaled = (v - min) / range;
            if invert { 1.0 - scaled } else { scaled }
        })
        .collect()
}

/// An explicitly named provider, without scoring
///
/// Fails when the named provider is not among the eligible candidates;
/// no other provider is substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredRanking {
    provider: String,
}

impl ConfiguredRanking {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
}

impl RankingStrategy for ConfiguredRanking {
    fn name(&self) -> &'static str {
        "configuration"
    }

    fn rank(
        &self,
        candidates: Vec<ProviderProfile>,
        _request: &RequestDescriptor,
    ) -> Result<Vec<ProviderProfile>> {
        let wanted = self.provider.trim();
        candidates
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted))
            .map(|p| vec![p])
            .ok_or_else(|| {
                Error::no_suitable_provider(format!(
                    "Configured provider '{wanted}' is not available for this request"
                ))
            })
    }
}
