//! Health Tracking for Provider Routing
//!
//! Keeps the latest health snapshot per provider, from live checks and
//! from passive observation of pipeline attempts.

use crate::config::HealthConfig;
use crate::logging::log_health_check;
use arbiter_domain::ports::ProviderAdapter;
use arbiter_domain::value_objects::HealthStatus;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Latest-value health cache
///
/// One snapshot per provider name, overwritten on every check or
/// observation. No history is kept.
#[derive(Debug)]
pub struct HealthTracker {
    snapshots: DashMap<String, HealthStatus>,
    ttl: Duration,
    check_timeout: Duration,
}

impl HealthTracker {
    /// Create a tracker from configuration
    pub fn new(config: &HealthConfig) -> Self {
        Self::with_settings(config.ttl(), config.check_timeout())
    }

    /// Create a tracker with explicit freshness and check timeout
    pub fn with_settings(ttl: Duration, check_timeout: Duration) -> Self {
        Self {
            snapshots: DashMap::new(),
            ttl,
            check_timeout,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn check_timeout(&self) -> Duration {
        self.check_timeout
    }

    /// Latest snapshot for a provider, fresh or not
    pub fn snapshot(&self, provider: &str) -> Option<HealthStatus> {
        self.snapshots.get(provider).map(|entry| entry.clone())
    }

    /// All current snapshots
    pub fn snapshots(&self) -> HashMap<String, HealthStatus> {
        self.snapshots
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Overwrite the snapshot for `status.provider`
    pub fn record(&self, status: HealthStatus) {
        self.snapshots.insert(status.provider.clone(), status);
    }

    /// Whether a snapshot is younger than the TTL at `now`
    pub fn is_fresh(&self, status: &HealthStatus, now: DateTime<Utc>) -> bool {
        status.age(now) < self.ttl
    }

    /// Run a live health check and record the result
    ///
    /// A check exceeding the timeout records an unhealthy snapshot.
    pub async fn check<P>(&self, provider: &P) -> HealthStatus
    where
        P: ProviderAdapter + ?Sized,
    {
        let name = provider.provider_name();
        let started = Instant::now();

        let mut status =
            match tokio::time::timeout(self.check_timeout, provider.check_health()).await {
                Ok(status) => status,
                Err(_) => HealthStatus::unhealthy(
                    name,
                    format!("Health check timed out after {:?}", self.check_timeout),
                ),
            };

        status.provider = name.to_string();
        status.checked_at = Utc::now();
        if status.response_time.is_none() {
            status.response_time = Some(started.elapsed());
        }

        log_health_check(name, status.healthy, &status.status);
        self.record(status.clone());
        status
    }

    /// Cached snapshot when fresh, otherwise a live check
    pub async fn get_or_check<P>(&self, provider: &P) -> HealthStatus
    where
        P: ProviderAdapter + ?Sized,
    {
        if let Some(status) = self.snapshot(provider.provider_name())
            && self.is_fresh(&status, Utc::now())
        {
            return status;
        }
        self.check(provider).await
    }

    /// Check every provider concurrently
    pub async fn check_all<P>(&self, providers: &[Arc<P>]) -> Vec<HealthStatus>
    where
        P: ProviderAdapter + ?Sized,
    {
        join_all(providers.iter().map(|p| self.check(p.as_ref()))).await
    }

    /// Record the outcome of a pipeline attempt
    pub fn observe(&self, provider: &str, ok: bool, latency: Duration, message: Option<&str>) {
        let status = if ok {
            HealthStatus::healthy(provider)
        } else {
            HealthStatus::unhealthy(provider, message.unwrap_or("Attempt failed"))
        };
        self.record(status.with_response_time(latency));
    }

    /// Whether a fresh snapshot marks the provider unhealthy
    ///
    /// Stale snapshots are ignored so a provider is not excluded forever.
    pub fn is_known_unhealthy(&self, provider: &str) -> bool {
        self.snapshot(provider)
            .is_some_and(|s| !s.healthy && self.is_fresh(&s, Utc::now()))
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new(&HealthConfig::default())
    }
}
