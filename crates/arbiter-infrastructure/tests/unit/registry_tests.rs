//! Unit tests for the provider registry and alias table

use crate::test_utils::{MockProvider, registry};
use arbiter_domain::error::Error;
use arbiter_domain::ports::ProviderAdapter;
use arbiter_infrastructure::config::RoutingConfig;
use arbiter_infrastructure::routing::{AliasTable, ProviderRegistry};
use std::sync::Arc;

fn providers() -> Vec<Arc<MockProvider>> {
    vec![
        MockProvider::new("OpenAI", 0.002).into_arc(),
        MockProvider::new("Anthropic", 0.003).into_arc(),
        MockProvider::new("Tesseract", 0.0).into_arc(),
    ]
}

fn resolved_name(registry: &ProviderRegistry<MockProvider>, query: &str) -> Option<String> {
    registry
        .resolve(query)
        .map(|p| p.provider_name().to_string())
}

#[test]
fn test_exact_match_ignores_case() {
    let registry = registry(&providers());
    assert_eq!(resolved_name(&registry, "openai").as_deref(), Some("OpenAI"));
    assert_eq!(resolved_name(&registry, "  TESSERACT ").as_deref(), Some("Tesseract"));
}

#[test]
fn test_substring_match_in_both_directions() {
    let registry = registry(&providers());
    // registry name contains the query
    assert_eq!(resolved_name(&registry, "thropic").as_deref(), Some("Anthropic"));
    // query contains the registry name
    assert_eq!(resolved_name(&registry, "tesseract-ocr-5").as_deref(), Some("Tesseract"));
}

#[test]
fn test_alias_resolves_to_canonical_name() {
    let registry = registry(&providers());
    assert_eq!(resolved_name(&registry, "gpt4").as_deref(), Some("OpenAI"));
    assert_eq!(resolved_name(&registry, "Claude").as_deref(), Some("Anthropic"));
}

#[test]
fn test_alias_to_unregistered_provider_is_not_found() {
    let registry = registry(&providers());
    // "gemini" maps to Google, which is not registered
    assert!(registry.resolve("gemini").is_none());
}

#[test]
fn test_unknown_name_is_not_found() {
    let registry = registry(&providers());
    assert!(registry.resolve("watson").is_none());
    assert!(registry.resolve("").is_none());

    match registry.resolve_or_err("watson") {
        Err(Error::ProviderNotFound { name }) => assert_eq!(name, "watson"),
        other => panic!("expected ProviderNotFound, got {:?}", other.map(|p| p.provider_name().to_string())),
    }
}

#[test]
fn test_configured_aliases_override_defaults() {
    let aliases = AliasTable::new()
        .with_aliases([("gpt4", "Anthropic"), ("ocr", "Tesseract")]);
    let registry = ProviderRegistry::from_providers(providers(), aliases).unwrap();

    assert_eq!(resolved_name(&registry, "gpt4").as_deref(), Some("Anthropic"));
    assert_eq!(resolved_name(&registry, "OCR").as_deref(), Some("Tesseract"));
}

#[test]
fn test_duplicate_names_are_rejected() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(MockProvider::new("OpenAI", 0.002).into_arc())
        .unwrap();

    let duplicate = registry.register(MockProvider::new("openai", 0.001).into_arc());
    assert!(matches!(duplicate, Err(Error::Configuration { .. })));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_negative_cost_is_rejected() {
    let result = ProviderRegistry::new().with_provider(MockProvider::new("Broken", -1.0).into_arc());
    assert!(matches!(result, Err(Error::Configuration { .. })));
}

#[test]
fn test_registration_order_is_kept() {
    let registry = registry(&providers());
    assert_eq!(registry.names(), vec!["OpenAI", "Anthropic", "Tesseract"]);
    assert_eq!(registry.position("tesseract"), Some(2));
    assert_eq!(registry.len(), 3);
    assert!(!registry.is_empty());
}

#[test]
fn test_alias_table_lookup() {
    let table = AliasTable::new();
    assert_eq!(table.canonical("GPT-4"), Some("OpenAI"));
    assert_eq!(table.canonical("unknown"), None);
    assert!(AliasTable::empty().is_empty());
}

#[test]
fn test_registry_from_routing_config_applies_aliases() {
    let mut config = RoutingConfig::default();
    config
        .aliases
        .insert("Scanner".to_string(), "Tesseract".to_string());
    config
        .aliases
        .insert("gpt".to_string(), "Anthropic".to_string());

    let table = AliasTable::from_config(&config);
    assert_eq!(table.canonical("scanner"), Some("Tesseract"));
    assert_eq!(table.canonical("claude"), Some("Anthropic"));

    let registry = ProviderRegistry::from_config(providers(), &config).unwrap();
    assert_eq!(resolved_name(&registry, "SCANNER").as_deref(), Some("Tesseract"));
    assert_eq!(resolved_name(&registry, "gpt").as_deref(), Some("Anthropic"));
}
