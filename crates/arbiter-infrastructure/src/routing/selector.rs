//! Provider Selector
//!
//! Filters the registry down to providers able to serve a request and
//! ranks them with the configured strategy.

use super::health::HealthTracker;
use super::registry::ProviderRegistry;
use super::strategies::StrategyRanking;
use crate::config::RoutingConfig;
use arbiter_domain::error::{Error, Result};
use arbiter_domain::ports::{ProviderAdapter, ProviderSelector, RankingStrategy};
use arbiter_domain::value_objects::{
    Capability, HealthStatus, ProviderProfile, RequestDescriptor, SelectionStrategy,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Capability-aware selector over a shared registry
///
/// Hard constraints (availability, required capabilities, input size and,
/// optionally, known-unhealthy status) filter candidates; the ranking
/// strategy only orders what is left.
pub struct DefaultProviderSelector<P: ?Sized> {
    registry: Arc<ProviderRegistry<P>>,
    health: Arc<HealthTracker>,
    ranking: Box<dyn RankingStrategy>,
    exclude_unhealthy: bool,
}

impl<P> DefaultProviderSelector<P>
where
    P: ProviderAdapter + ?Sized + 'static,
{
    /// Create a selector from routing configuration
    ///
    /// A configured provider name is resolved through the registry once,
    /// so aliases and naming drift are tolerated.
    pub fn new(
        registry: Arc<ProviderRegistry<P>>,
        health: Arc<HealthTracker>,
        config: &RoutingConfig,
    ) -> Self {
        let strategy = match &config.strategy {
            SelectionStrategy::Configuration { provider } => registry
                .resolve(provider)
                .map_or_else(
                    || config.strategy.clone(),
                    |resolved| SelectionStrategy::Configuration {
                        provider: resolved.provider_name().to_string(),
                    },
                ),
            other => other.clone(),
        };

        Self::with_ranking(registry, health, strategy.ranking(config.balanced_weights))
            .with_exclude_unhealthy(config.exclude_unhealthy)
    }

    /// Create a selector with an explicit ranking implementation
    pub fn with_ranking(
        registry: Arc<ProviderRegistry<P>>,
        health: Arc<HealthTracker>,
        ranking: Box<dyn RankingStrategy>,
    ) -> Self {
        Self {
            registry,
            health,
            ranking,
            exclude_unhealthy: false,
        }
    }

    /// Also filter out providers whose fresh snapshot is unhealthy
    pub fn with_exclude_unhealthy(mut self, exclude_unhealthy: bool) -> Self {
        self.exclude_unhealthy = exclude_unhealthy;
        self
    }

    /// Name of the active ranking strategy
    pub fn strategy_name(&self) -> &'static str {
        self.ranking.name()
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry<P>> {
        &self.registry
    }

    pub fn health(&self) -> &Arc<HealthTracker> {
        &self.health
    }

    /// Whether `provider` passes every hard constraint of `request`
    fn is_eligible(&self, provider: &P, request: &RequestDescriptor) -> bool {
        let capabilities = provider.capabilities();
        provider.is_available()
            && capabilities.satisfies(&request.required)
            && capabilities.accepts_input(request.payload_bytes)
            && !(self.exclude_unhealthy && self.health.is_known_unhealthy(provider.provider_name()))
    }

    /// Eligible providers, best-first
    fn ranked(&self, request: &RequestDescriptor) -> Result<Vec<Arc<P>>> {
        let mut by_order: HashMap<usize, Arc<P>> = HashMap::new();
        let mut profiles: Vec<ProviderProfile> = Vec::new();

        for (order, provider) in self.registry.iter().enumerate() {
            if self.is_eligible(provider.as_ref(), request) {
                profiles.push(provider.profile(order));
                by_order.insert(order, Arc::clone(provider));
            }
        }

        if profiles.is_empty() {
            return Err(Error::no_suitable_provider(no_candidates_message(request)));
        }

        debug!(
            strategy = self.ranking.name(),
            operation = %request.operation,
            candidates = profiles.len(),
            "Ranking providers"
        );

        let ranked = self.ranking.rank(profiles, request)?;
        Ok(ranked
            .into_iter()
            .filter_map(|profile| by_order.remove(&profile.order))
            .collect())
    }
}

fn no_candidates_message(request: &RequestDescriptor) -> String {
    if request.required.is_empty() {
        format!("no provider is available for '{}'", request.operation)
    } else {
        let required: Vec<&str> = request.required.iter().map(|c| Capability::as_str(*c)).collect();
        format!(
            "no available provider supports [{}] for '{}'",
            required.join(", "),
            request.operation
        )
    }
}

#[async_trait]
impl<P> ProviderSelector<P> for DefaultProviderSelector<P>
where
    P: ProviderAdapter + ?Sized + 'static,
{
    async fn select_best_provider(&self, request: &RequestDescriptor) -> Result<Arc<P>> {
        let selected = self
            .ranked(request)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::no_suitable_provider(no_candidates_message(request)))?;

        debug!(
            strategy = self.ranking.name(),
            provider = selected.provider_name(),
            "Selected provider"
        );
        Ok(selected)
    }

    async fn rank_providers(&self, request: &RequestDescriptor) -> Result<Vec<Arc<P>>> {
        self.ranked(request)
    }

    fn get_available_providers(&self) -> Vec<Arc<P>> {
        self.registry
            .iter()
            .filter(|p| p.is_available())
            .cloned()
            .collect()
    }

    async fn get_provider_health(&self, name: &str) -> HealthStatus {
        match self.registry.resolve(name) {
            Some(provider) => self.health.get_or_check(provider.as_ref()).await,
            None => HealthStatus::not_found(name),
        }
    }
}

impl<P> fmt::Debug for DefaultProviderSelector<P>
where
    P: ProviderAdapter + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultProviderSelector")
            .field("registry", &self.registry)
            .field("ranking", &self.ranking)
            .field("exclude_unhealthy", &self.exclude_unhealthy)
            .finish()
    }
}
