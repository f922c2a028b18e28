//! Cost Tracking Module
//!
//! Cost estimation plus an append-only, time-windowed ledger of actual
//! per-call costs.

use crate::config::CostConfig;
use arbiter_domain::ports::CostAnalyzer;
use arbiter_domain::value_objects::{
    CostBreakdown, CostRecord, CostReport, ProviderCapabilities, RequestDescriptor,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default cost analyzer backed by a concurrent ledger
///
/// Records are grouped per provider. Aggregation snapshots the matching
/// records first and folds them after every shard lock is released.
///
/// Writes prune expired records at most once per retention period, so a
/// record lives between one and two retention periods.
#[derive(Debug)]
pub struct DefaultCostAnalyzer {
    /// Append-only records per provider
    ledger: DashMap<String, Vec<CostRecord>>,
    /// Spending limits per provider over the default window
    budgets: DashMap<String, f64>,
    /// Milliseconds since the epoch of the last prune
    last_prune_ms: AtomicI64,
    config: CostConfig,
}

impl DefaultCostAnalyzer {
    /// Create a cost analyzer with default configuration
    pub fn new() -> Self {
        Self::with_config(CostConfig::default())
    }

    /// Create a cost analyzer with custom configuration
    pub fn with_config(config: CostConfig) -> Self {
        let budgets = config
            .budgets
            .iter()
            .map(|(provider, budget)| (provider.clone(), *budget))
            .collect();
        Self {
            ledger: DashMap::new(),
            budgets,
            last_prune_ms: AtomicI64::new(Utc::now().timestamp_millis()),
            config,
        }
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    /// Set the spending limit of a provider over the default window
    pub fn set_budget(&self, provider: &str, budget: f64) {
        info!("Set budget for provider {}: {}", provider, budget);
        self.budgets.insert(provider.to_string(), budget);
    }

    /// Whether the provider's spend over the default window is within budget
    ///
    /// Providers without a budget are always within it.
    pub fn is_within_budget(&self, provider: &str) -> bool {
        self.is_within_budget_at(provider, Utc::now())
    }

    /// [`is_within_budget`](Self::is_within_budget) evaluated at `now`
    pub fn is_within_budget_at(&self, provider: &str, now: DateTime<Utc>) -> bool {
        let Some(budget) = self.budgets.get(provider).map(|b| *b) else {
            return true;
        };
        self.provider_cost_at(provider, self.config.default_window(), now) <= budget
    }

    /// Summed cost of one provider in `[now - window, now]`
    pub fn provider_cost_at(&self, provider: &str, window: Duration, now: DateTime<Utc>) -> f64 {
        let start = window_start(window, now);
        self.ledger.get(provider).map_or(0.0, |records| {
            records
                .iter()
                .filter(|r| r.within(start, now))
                .fold(0.0, |total, r| total + r.amount)
        })
    }

    /// Sum of costs in `[now - window, now]`
    pub fn get_total_cost_at(&self, window: Duration, now: DateTime<Utc>) -> f64 {
        self.records_in(window, now)
            .iter()
            .fold(0.0, |total, r| total + r.amount)
    }

    /// Summed cost per provider in `[now - window, now]`
    pub fn get_cost_breakdown_at(&self, window: Duration, now: DateTime<Utc>) -> CostBreakdown {
        self.records_in(window, now)
            .into_iter()
            .fold(CostBreakdown::new(), |mut breakdown, record| {
                *breakdown.entry(record.provider).or_insert(0.0) += record.amount;
                breakdown
            })
    }

    /// Cost report for `[now - window, now]`
    pub fn generate_cost_report_at(&self, window: Duration, now: DateTime<Utc>) -> CostReport {
        let records = self.records_in(window, now);
        CostReport::from_records(&records, window, now)
    }

    /// Drop records older than the retention window; returns how many were removed
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        self.last_prune_ms
            .store(now.timestamp_millis(), Ordering::Relaxed);
        let cutoff = window_start(self.config.retention(), now);
        let mut removed = 0;
        for mut entry in self.ledger.iter_mut() {
            let before = entry.len();
            entry.retain(|r| r.timestamp >= cutoff);
            removed += before - entry.len();
        }
        self.ledger.retain(|_, records| !records.is_empty());
        if removed > 0 {
            debug!(removed = removed, "Pruned expired cost records");
        }
        removed
    }

    /// Number of records currently held
    pub fn record_count(&self) -> usize {
        self.ledger.iter().map(|entry| entry.len()).sum()
    }

    /// Prune when a full retention period has passed since the last prune
    fn prune_if_due(&self, now: DateTime<Utc>) {
        let last = self.last_prune_ms.load(Ordering::Relaxed);
        let retention_ms = i64::try_from(self.config.retention().as_millis()).unwrap_or(i64::MAX);
        if now.timestamp_millis().saturating_sub(last) < retention_ms {
            return;
        }
        // One writer wins the prune; the others keep appending
        if self
            .last_prune_ms
            .compare_exchange(last, now.timestamp_millis(), Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
        {
            self.prune(now);
        }
    }

    /// Copy of every record in `[now - window, now]`
    fn records_in(&self, window: Duration, now: DateTime<Utc>) -> Vec<CostRecord> {
        if window > self.config.retention() {
            warn!(
                window = ?window,
                retention = ?self.config.retention(),
                "Cost window exceeds record retention; older records may already be pruned"
            );
        }
        let start = window_start(window, now);
        self.ledger
            .iter()
            .flat_map(|entry| {
                entry
                    .iter()
                    .filter(|r| r.within(start, now))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn warn_if_over_budget(&self, provider: &str, now: DateTime<Utc>) {
        let Some(budget) = self.budgets.get(provider).map(|b| *b) else {
            return;
        };
        let spent = self.provider_cost_at(provider, self.config.default_window(), now);
        if spent > budget {
            warn!(
                "Budget exceeded for provider {}: current={}, limit={}",
                provider, spent, budget
            );
        }
    }
}

impl Default for DefaultCostAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl CostAnalyzer for DefaultCostAnalyzer {
    fn estimate_cost(
        &self,
        capabilities: &ProviderCapabilities,
        request: &RequestDescriptor,
    ) -> f64 {
        capabilities.estimate_cost(
            request.payload_bytes,
            self.config.surcharge_threshold_bytes,
            self.config.surcharge_per_mib,
        )
    }

    fn record_cost_at(&self, provider: &str, amount: f64, timestamp: DateTime<Utc>) {
        if !amount.is_finite() || amount < 0.0 {
            warn!(provider = provider, amount = amount, "Ignoring invalid cost record");
            return;
        }

        self.ledger
            .entry(provider.to_string())
            .or_default()
            .push(CostRecord::new(provider, amount, timestamp));

        debug!(provider = provider, amount = amount, "Recorded cost");

        let now = Utc::now().max(timestamp);
        self.prune_if_due(now);
        self.warn_if_over_budget(provider, now);
    }

    fn get_total_cost(&self, window: Duration) -> f64 {
        self.get_total_cost_at(window, Utc::now())
    }

    fn get_cost_breakdown(&self, window: Duration) -> CostBreakdown {
        self.get_cost_breakdown_at(window, Utc::now())
    }

    fn generate_cost_report(&self, window: Duration) -> CostReport {
        self.generate_cost_report_at(window, Utc::now())
    }
}

/// `now - window`, saturating at the earliest representable time
fn window_start(window: Duration, now: DateTime<Utc>) -> DateTime<Utc> {
    chrono::Duration::from_std(window)
        .ok()
        .and_then(|w| now.checked_sub_signed(w))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
