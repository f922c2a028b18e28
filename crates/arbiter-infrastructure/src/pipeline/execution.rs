//! Execution pipeline
//!
//! Per logical call: resolve primary → attempt loop with backoff →
//! on exhaustion, one attempt loop against the fallback.

use super::backoff::BackoffPolicy;
use super::routing::ProviderRouting;
use crate::config::PipelineConfig;
use arbiter_domain::error::{Error, Result};
use arbiter_domain::ports::ProviderAdapter;
use arbiter_domain::value_objects::{ExecutionResult, RequestDescriptor};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Context handed to the provider operation on every attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    /// Canonical name of the provider being called
    pub provider: String,
    /// Model override for this provider
    pub model: Option<String>,
    /// Attempt number against this provider, starting at 1
    pub attempt: u32,
    /// Whether this is the fallback provider
    pub fallback: bool,
}

/// How one provider's attempt loop ended
enum LoopOutcome<T> {
    Succeeded(T),
    Exhausted(String),
}

/// Retry-then-fallback executor for one logical pipeline
///
/// The configuration is validated at construction and read-only afterwards.
/// Attempts run one at a time; primary and fallback never race.
pub struct ExecutionPipeline<P>
where
    P: ProviderAdapter + ?Sized + 'static,
{
    name: String,
    routing: ProviderRouting<P>,
    config: PipelineConfig,
    backoff: BackoffPolicy,
}

impl<P> ExecutionPipeline<P>
where
    P: ProviderAdapter + ?Sized + 'static,
{
    /// Create a pipeline, failing fast on invalid configuration
    pub fn new(
        name: impl Into<String>,
        routing: ProviderRouting<P>,
        config: PipelineConfig,
        backoff: BackoffPolicy,
    ) -> Result<Self> {
        let name = name.into();
        config
            .validate()
            .map_err(|e| Error::configuration(format!("Invalid pipeline '{name}': {e}")))?;

        Ok(Self {
            name,
            routing,
            config,
            backoff,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn routing(&self) -> &ProviderRouting<P> {
        &self.routing
    }

    /// Run `operation` against the primary provider, then the fallback
    ///
    /// Every outcome except cancellation is returned as an
    /// [`ExecutionResult`]; a failure carries one concise message.
    /// Cancellation aborts waits and in-flight attempts and returns
    /// `Err(Error::Cancelled)`.
    pub async fn execute<T, F, Fut>(
        &self,
        request: &RequestDescriptor,
        cancel: &CancellationToken,
        operation: F,
    ) -> Result<ExecutionResult<T>>
    where
        F: Fn(Arc<P>, ProviderCall) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let primary = match self.resolve_primary(request).await {
            Ok(provider) => provider,
            Err(e) if e.is_cancelled() => return Err(e),
            Err(e) => {
                error!(pipeline = %self.name, error = %e, "No provider to execute");
                return Ok(ExecutionResult::failure(e.to_string()));
            }
        };

        let primary_error = match self
            .run_attempts(
                &primary,
                self.config.model.clone(),
                false,
                request,
                cancel,
                &operation,
            )
            .await?
        {
            LoopOutcome::Succeeded(value) => return Ok(ExecutionResult::Success(value)),
            LoopOutcome::Exhausted(message) => message,
        };

        let Some(fallback_name) = self.config.fallback() else {
            error!(
                pipeline = %self.name,
                provider = primary.provider_name(),
                error = %primary_error,
                "Primary provider exhausted and no fallback configured"
            );
            return Ok(ExecutionResult::failure(primary_error));
        };

        let fallback = match self.resolve_fallback(fallback_name) {
            Ok(provider) => provider,
            Err(e) => {
                error!(
                    pipeline = %self.name,
                    error = %e,
                    "Fallback provider could not be resolved"
                );
                return Ok(ExecutionResult::failure(primary_error));
            }
        };

        warn!(
            pipeline = %self.name,
            primary = primary.provider_name(),
            fallback = fallback.provider_name(),
            "Primary provider exhausted, trying fallback"
        );

        match self
            .run_attempts(
                &fallback,
                self.config.fallback_model.clone(),
                true,
                request,
                cancel,
                &operation,
            )
            .await?
        {
            LoopOutcome::Succeeded(value) => Ok(ExecutionResult::Success(value)),
            LoopOutcome::Exhausted(message) => {
                error!(
                    pipeline = %self.name,
                    provider = fallback.provider_name(),
                    error = %message,
                    "All providers exhausted"
                );
                Ok(ExecutionResult::failure(message))
            }
        }
    }

    /// Configured primary when it resolves to an available provider,
    /// otherwise the selector's choice
    async fn resolve_primary(&self, request: &RequestDescriptor) -> Result<Arc<P>> {
        if let Some(configured) = self.config.primary() {
            match self.routing.registry.resolve(configured) {
                Some(provider) if provider.is_available() => {
                    debug!(
                        pipeline = %self.name,
                        configured = configured,
                        provider = provider.provider_name(),
                        "Using configured primary provider"
                    );
                    return Ok(provider);
                }
                Some(provider) => warn!(
                    pipeline = %self.name,
                    provider = provider.provider_name(),
                    "Configured primary provider is unavailable, delegating to selector"
                ),
                None => warn!(
                    pipeline = %self.name,
                    configured = configured,
                    "Configured primary provider not found, delegating to selector"
                ),
            }
        } else {
            warn!(
                pipeline = %self.name,
                "No primary provider configured, delegating to selector"
            );
        }
        self.routing.selector.select_best_provider(request).await
    }

    /// Fallback resolution never delegates to the selector
    fn resolve_fallback(&self, configured: &str) -> Result<Arc<P>> {
        let provider = self.routing.registry.resolve_or_err(configured)?;
        if !provider.is_available() {
            return Err(Error::no_suitable_provider(format!(
                "fallback provider '{}' is unavailable",
                provider.provider_name()
            )));
        }
        Ok(provider)
    }

    /// Up to `max_retries + 1` attempts against one provider
    async fn run_attempts<T, F, Fut>(
        &self,
        provider: &Arc<P>,
        model: Option<String>,
        fallback: bool,
        request: &RequestDescriptor,
        cancel: &CancellationToken,
        operation: &F,
    ) -> Result<LoopOutcome<T>>
    where
        F: Fn(Arc<P>, ProviderCall) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        let name = provider.provider_name();
        let max_attempts = self.config.max_attempts();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.backoff.delay_for(attempt - 1);
                debug!(
                    provider = name,
                    attempt = attempt,
                    delay = ?delay,
                    "Backing off before retry"
                );
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => return Err(Error::Cancelled),
                    () = tokio::time::sleep(delay) => {}
                }
            }

            let call = ProviderCall {
                provider: name.to_string(),
                model: model.clone(),
                attempt,
                fallback,
            };
            let started = Instant::now();
            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(Error::Cancelled),
                outcome = self.attempt(provider, call, operation) => outcome,
            };
            let latency = started.elapsed();

            match outcome {
                Ok(value) => {
                    self.routing.health.observe(name, true, latency, None);
                    let costs = &self.routing.costs;
                    costs.record_cost(name, costs.estimate_cost(provider.capabilities(), request));
                    if attempt > 1 || fallback {
                        info!(
                            pipeline = %self.name,
                            provider = name,
                            attempt = attempt,
                            fallback = fallback,
                            "Provider call succeeded"
                        );
                    } else {
                        debug!(pipeline = %self.name, provider = name, "Provider call succeeded");
                    }
                    return Ok(LoopOutcome::Succeeded(value));
                }
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => {
                    let message = e.summary();
                    warn!(
                        pipeline = %self.name,
                        provider = name,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        transient = e.is_transient(),
                        error = ?e,
                        "Provider attempt failed"
                    );
                    self.routing
                        .health
                        .observe(name, false, latency, Some(&message));
                    last_error = message;
                }
            }
        }

        Ok(LoopOutcome::Exhausted(last_error))
    }

    /// One provider call, bounded by the timeout and shielded from panics
    async fn attempt<T, F, Fut>(
        &self,
        provider: &Arc<P>,
        call: ProviderCall,
        operation: &F,
    ) -> Result<T>
    where
        F: Fn(Arc<P>, ProviderCall) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        let name = call.provider.clone();
        let guarded = AssertUnwindSafe(operation(Arc::clone(provider), call))
            .catch_unwind()
            .map(|outcome| {
                outcome.unwrap_or_else(|panic| {
                    Err(Error::execution(
                        name.clone(),
                        format!("provider panicked: {}", panic_message(panic.as_ref())),
                    ))
                })
            });

        match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .unwrap_or_else(|_| Err(Error::timeout(name.clone(), limit))),
            None => guarded.await,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    panic
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| panic.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
