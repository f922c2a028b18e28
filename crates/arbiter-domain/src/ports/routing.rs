//! Provider Routing Ports
//!
//! Defines the contracts for provider selection, ranking and cost
//! accounting used by the execution pipeline.

use crate::error::Result;
use crate::ports::providers::ProviderAdapter;
use crate::value_objects::{
    CostBreakdown, CostReport, HealthStatus, ProviderCapabilities, ProviderProfile,
    RequestDescriptor,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Ranks eligible candidates for one selection strategy
///
/// Candidates reaching a strategy already satisfy every hard constraint.
/// Implementations return them best-first; sorts must be stable so that
/// registration order breaks ties.
pub trait RankingStrategy: Send + Sync + fmt::Debug {
    /// Strategy name for logs
    fn name(&self) -> &'static str;

    /// Order `candidates` best-first
    fn rank(
        &self,
        candidates: Vec<ProviderProfile>,
        request: &RequestDescriptor,
    ) -> Result<Vec<ProviderProfile>>;
}

/// Provider selection interface
///
/// Filters the registered providers down to those able to serve a request
/// and ranks them with the configured strategy.
#[async_trait]
pub trait ProviderSelector<P>: Send + Sync
where
    P: ProviderAdapter + ?Sized + 'static,
{
    /// Select the single best provider for the request
    async fn select_best_provider(&self, request: &RequestDescriptor) -> Result<Arc<P>>;

    /// Every eligible provider, best-first
    async fn rank_providers(&self, request: &RequestDescriptor) -> Result<Vec<Arc<P>>>;

    /// Providers whose local availability check passes, in registration order
    fn get_available_providers(&self) -> Vec<Arc<P>>;

    /// Health snapshot for a provider; never fails
    ///
    /// Unknown names yield an unhealthy "Provider not found" status.
    async fn get_provider_health(&self, name: &str) -> HealthStatus;
}

/// Cost estimation and time-windowed cost ledger
///
/// # Example
///
/// ```ignore
/// let estimate = analyzer.estimate_cost(provider.capabilities(), &request);
/// analyzer.record_cost(provider.provider_name(), estimate);
///
/// let report = analyzer.generate_cost_report(Duration::from_secs(3600));
/// println!("{} requests, {:.4} total", report.total_requests, report.total_cost);
/// ```
pub trait CostAnalyzer: Send + Sync {
    /// Estimated cost of serving `request` with a provider
    fn estimate_cost(&self, capabilities: &ProviderCapabilities, request: &RequestDescriptor)
    -> f64;

    /// Append a cost record stamped now
    fn record_cost(&self, provider: &str, amount: f64) {
        self.record_cost_at(provider, amount, Utc::now());
    }

    /// Append a cost record with an explicit timestamp
    fn record_cost_at(&self, provider: &str, amount: f64, timestamp: DateTime<Utc>);

    /// Sum of costs recorded in `[now - window, now]`
    fn get_total_cost(&self, window: Duration) -> f64;

    /// Summed cost per provider in `[now - window, now]`
    fn get_cost_breakdown(&self, window: Duration) -> CostBreakdown;

    /// Totals, counts and per-provider breakdown in `[now - window, now]`
    fn generate_cost_report(&self, window: Duration) -> CostReport;
}
