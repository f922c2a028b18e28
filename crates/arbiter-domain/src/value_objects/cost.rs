//! Cost ledger records and reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// One recorded provider charge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub provider: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
}

impl CostRecord {
    /// Create a record
    pub fn new(provider: impl Into<String>, amount: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            provider: provider.into(),
            amount,
            timestamp,
        }
    }

    /// Whether the record falls within `[start, end]`
    pub fn within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.timestamp >= start && self.timestamp <= end
    }
}

/// Summed cost per provider, keyed by provider name
pub type CostBreakdown = BTreeMap<String, f64>;

/// Aggregated view of the ledger over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    /// Length of the aggregation window
    pub window: Duration,
    /// End of the window
    pub generated_at: DateTime<Utc>,
    /// Sum of every record in the window
    pub total_cost: f64,
    /// Number of records in the window
    pub total_requests: u64,
    /// `total_cost / total_requests`, 0 when there are no requests
    pub average_cost_per_request: f64,
    /// Summed cost per provider
    pub per_provider: CostBreakdown,
}

impl CostReport {
    /// Build a report from the records that fall inside the window
    pub fn from_records<'a, I>(records: I, window: Duration, generated_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a CostRecord>,
    {
        let mut per_provider = CostBreakdown::new();
        let mut total_cost = 0.0;
        let mut total_requests = 0u64;

        for record in records {
            *per_provider.entry(record.provider.clone()).or_insert(0.0) += record.amount;
            total_cost += record.amount;
            total_requests += 1;
        }

        let average_cost_per_request = if total_requests == 0 {
            0.0
        } else {
            total_cost / total_requests as f64
        };

        Self {
            window,
            generated_at,
            total_cost,
            total_requests,
            average_cost_per_request,
            per_provider,
        }
    }
}
