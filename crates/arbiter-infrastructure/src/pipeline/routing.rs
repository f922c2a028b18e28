//! Shared routing context

use crate::config::AppConfig;
use crate::routing::{
    DefaultCostAnalyzer, DefaultProviderSelector, HealthTracker, ProviderRegistry,
};
use arbiter_domain::error::Result;
use arbiter_domain::ports::{CostAnalyzer, ProviderAdapter, ProviderSelector};
use std::sync::Arc;

/// Collaborators shared by every pipeline over one provider family
///
/// The registry is read-only; the cost ledger and health cache are the
/// only state mutated by concurrent pipelines.
pub struct ProviderRouting<P>
where
    P: ProviderAdapter + ?Sized + 'static,
{
    pub registry: Arc<ProviderRegistry<P>>,
    pub selector: Arc<dyn ProviderSelector<P>>,
    pub costs: Arc<dyn CostAnalyzer>,
    pub health: Arc<HealthTracker>,
}

impl<P> ProviderRouting<P>
where
    P: ProviderAdapter + ?Sized + 'static,
{
    pub fn new(
        registry: Arc<ProviderRegistry<P>>,
        selector: Arc<dyn ProviderSelector<P>>,
        costs: Arc<dyn CostAnalyzer>,
        health: Arc<HealthTracker>,
    ) -> Self {
        Self {
            registry,
            selector,
            costs,
            health,
        }
    }

    /// Default selector, cost analyzer and health tracker for `registry`
    pub fn from_config(registry: Arc<ProviderRegistry<P>>, config: &AppConfig) -> Self {
        let health = Arc::new(HealthTracker::new(&config.health));
        let selector = Arc::new(DefaultProviderSelector::new(
            Arc::clone(&registry),
            Arc::clone(&health),
            &config.routing,
        ));
        let costs = Arc::new(DefaultCostAnalyzer::with_config(config.cost.clone()));
        Self::new(registry, selector, costs, health)
    }

    /// Register `providers` with the configured aliases, then wire the defaults
    pub fn from_providers<I>(providers: I, config: &AppConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<P>>,
    {
        let registry = ProviderRegistry::from_config(providers, &config.routing)?;
        Ok(Self::from_config(Arc::new(registry), config))
    }
}

impl<P> Clone for ProviderRouting<P>
where
    P: ProviderAdapter + ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            selector: Arc::clone(&self.selector),
            costs: Arc::clone(&self.costs),
            health: Arc::clone(&self.health),
        }
    }
}
