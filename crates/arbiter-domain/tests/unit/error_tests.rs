//! Unit tests for the error taxonomy

use arbiter_domain::error::Error;
use std::time::Duration;

#[test]
fn test_kind_strings_are_stable() {
    assert_eq!(Error::no_suitable_provider("x").kind_str(), "no_suitable_provider");
    assert_eq!(Error::provider_not_found("x").kind_str(), "provider_not_found");
    assert_eq!(Error::execution("p", "boom").kind_str(), "execution");
    assert_eq!(Error::timeout("p", Duration::from_secs(1)).kind_str(), "timeout");
    assert_eq!(Error::Cancelled.kind_str(), "cancelled");
    assert_eq!(Error::configuration("bad").kind_str(), "configuration");
    assert_eq!(Error::internal("oops").kind_str(), "internal");
}

#[test]
fn test_only_adapter_failures_are_transient() {
    assert!(Error::execution("p", "boom").is_transient());
    assert!(Error::timeout("p", Duration::from_secs(2)).is_transient());
    assert!(!Error::Cancelled.is_transient());
    assert!(!Error::no_suitable_provider("none").is_transient());
    assert!(!Error::configuration("bad").is_transient());
}

#[test]
fn test_cancelled_detection() {
    assert!(Error::Cancelled.is_cancelled());
    assert!(!Error::execution("p", "boom").is_cancelled());
}

#[test]
fn test_summary_prefixes_kind() {
    let error = Error::execution("OpenAI", "connection reset");
    assert_eq!(
        error.summary(),
        "execution: Provider 'OpenAI' failed: connection reset"
    );
}

#[test]
fn test_execution_error_keeps_source() {
    let io = std::io::Error::other("socket closed");
    let error = Error::execution_with_source("Tesseract", "read failed", io);
    let source = std::error::Error::source(&error).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("socket closed"));
}

#[test]
fn test_configuration_display() {
    let error = Error::configuration("max_retries must be at most 10");
    assert_eq!(
        error.to_string(),
        "Configuration error: max_retries must be at most 10"
    );
}
