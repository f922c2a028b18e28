//! Provider Registry
//!
//! Holds the providers known to the process and resolves configured,
//! human-typed names to them.

use crate::config::RoutingConfig;
use arbiter_domain::error::{Error, Result};
use arbiter_domain::ports::ProviderAdapter;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Aliases registered by default, as `(alias, canonical name)`
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("gpt4", "OpenAI"),
    ("gpt-4", "OpenAI"),
    ("gpt-4o", "OpenAI"),
    ("gpt", "OpenAI"),
    ("chatgpt", "OpenAI"),
    ("claude", "Anthropic"),
    ("gemini", "Google"),
    ("bard", "Google"),
    ("llama", "Ollama"),
    ("tesseract", "Tesseract"),
    ("textract", "AwsTextract"),
    ("gcv", "GoogleVision"),
    ("azure-ocr", "AzureVision"),
];

/// Alias → canonical provider name lookup
///
/// Keys are matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    /// Table pre-filled with the common provider aliases
    pub fn new() -> Self {
        DEFAULT_ALIASES
            .iter()
            .fold(Self::empty(), |table, (alias, canonical)| {
                table.with_alias(*alias, *canonical)
            })
    }

    /// Default aliases with the `[routing.aliases]` entries merged over them
    pub fn from_config(config: &RoutingConfig) -> Self {
        Self::new().with_aliases(&config.aliases)
    }

    /// Table without any entries
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace one alias
    pub fn with_alias(mut self, alias: impl AsRef<str>, canonical: impl Into<String>) -> Self {
        self.insert(alias, canonical);
        self
    }

    /// Merge configured aliases; configured entries win over defaults
    pub fn with_aliases<I, K, V>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (alias, canonical) in aliases {
            self.insert(alias, canonical);
        }
        self
    }

    fn insert(&mut self, alias: impl AsRef<str>, canonical: impl Into<String>) {
        self.entries
            .insert(alias.as_ref().trim().to_lowercase(), canonical.into());
    }

    /// Canonical name registered for `alias`
    pub fn canonical(&self, alias: &str) -> Option<&str> {
        self.entries
            .get(&alias.trim().to_lowercase())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered set of providers, constructed once and shared read-only
///
/// Registration order is significant: ranking strategies use it to break
/// ties, and substring resolution returns the first match in this order.
pub struct ProviderRegistry<P: ?Sized> {
    providers: Vec<Arc<P>>,
    aliases: AliasTable,
}

impl<P> ProviderRegistry<P>
where
    P: ProviderAdapter + ?Sized,
{
    /// Empty registry using the default alias table
    pub fn new() -> Self {
        Self::with_alias_table(AliasTable::new())
    }

    /// Empty registry using `aliases`
    pub fn with_alias_table(aliases: AliasTable) -> Self {
        Self {
            providers: Vec::new(),
            aliases,
        }
    }

    /// Build a registry from providers in registration order
    pub fn from_providers<I>(providers: I, aliases: AliasTable) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<P>>,
    {
        let mut registry = Self::with_alias_table(aliases);
        for provider in providers {
            registry.register(provider)?;
        }
        Ok(registry)
    }

    /// Build a registry whose alias table includes the configured aliases
    pub fn from_config<I>(providers: I, config: &RoutingConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<P>>,
    {
        Self::from_providers(providers, AliasTable::from_config(config))
    }

    /// Append a provider
    ///
    /// Names are unique case-insensitively; a duplicate is a configuration error.
    pub fn register(&mut self, provider: Arc<P>) -> Result<()> {
        let name = provider.provider_name().trim();
        if name.is_empty() {
            return Err(Error::configuration("Provider name cannot be empty"));
        }
        if self.get(name).is_some() {
            return Err(Error::configuration(format!(
                "Provider '{name}' is already registered"
            )));
        }
        provider.capabilities().validate().map_err(|e| {
            Error::configuration(format!("Invalid capabilities for '{name}': {e}"))
        })?;

        debug!(provider = name, order = self.providers.len(), "Registered provider");
        self.providers.push(provider);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_provider(mut self, provider: Arc<P>) -> Result<Self> {
        self.register(provider)?;
        Ok(self)
    }

    /// Exact, case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<Arc<P>> {
        let name = name.trim();
        self.providers
            .iter()
            .find(|p| p.provider_name().eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Layered lookup of a configured name
    ///
    /// Tries, in order: exact case-insensitive name, substring match in
    /// either direction, then the alias table.
    pub fn resolve(&self, query: &str) -> Option<Arc<P>> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(provider) = self.get(query) {
            return Some(provider);
        }

        let needle = query.to_lowercase();
        if let Some(provider) = self.providers.iter().find(|p| {
            let name = p.provider_name().to_lowercase();
            name.contains(&needle) || needle.contains(&name)
        }) {
            debug!(query = query, provider = provider.provider_name(), "Resolved by substring");
            return Some(Arc::clone(provider));
        }

        let canonical = self.aliases.canonical(query)?;
        let provider = self.get(canonical)?;
        debug!(query = query, provider = provider.provider_name(), "Resolved by alias");
        Some(provider)
    }

    /// [`resolve`](Self::resolve), failing with `ProviderNotFound`
    pub fn resolve_or_err(&self, query: &str) -> Result<Arc<P>> {
        self.resolve(query)
            .ok_or_else(|| Error::provider_not_found(query))
    }

    /// Registration index of the provider named exactly `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.providers
            .iter()
            .position(|p| p.provider_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Providers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<P>> {
        self.providers.iter()
    }

    /// Provider names in registration order
    pub fn names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.provider_name().to_string())
            .collect()
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<P> Default for ProviderRegistry<P>
where
    P: ProviderAdapter + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for ProviderRegistry<P>
where
    P: ProviderAdapter + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.names())
            .field("aliases", &self.aliases.len())
            .finish()
    }
}
