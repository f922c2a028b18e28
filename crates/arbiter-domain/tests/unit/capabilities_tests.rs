//! Unit tests for provider capability descriptors

use arbiter_domain::constants::{
    BYTES_PER_MIB, DEFAULT_SIZE_SURCHARGE_PER_MIB, SIZE_SURCHARGE_THRESHOLD_BYTES,
};
use arbiter_domain::value_objects::{Capability, ProviderCapabilities, ProviderFeatures};
use std::collections::BTreeSet;
use std::time::Duration;

fn caps(cost: f64) -> ProviderCapabilities {
    ProviderCapabilities::new(cost, Duration::from_millis(250))
}

#[test]
fn test_two_mib_payload_pays_one_mib_surcharge() {
    let estimate = caps(0.001).estimate_cost(
        2 * BYTES_PER_MIB,
        SIZE_SURCHARGE_THRESHOLD_BYTES,
        DEFAULT_SIZE_SURCHARGE_PER_MIB,
    );
    assert!((estimate - 0.0011).abs() < 1e-12);
}

#[test]
fn test_small_payload_pays_base_cost() {
    let estimate = caps(0.001).estimate_cost(
        512,
        SIZE_SURCHARGE_THRESHOLD_BYTES,
        DEFAULT_SIZE_SURCHARGE_PER_MIB,
    );
    assert!((estimate - 0.001).abs() < f64::EPSILON);
}

#[test]
fn test_surcharge_is_proportional_to_excess() {
    let estimate = caps(0.0).estimate_cost(
        BYTES_PER_MIB + BYTES_PER_MIB / 2,
        SIZE_SURCHARGE_THRESHOLD_BYTES,
        0.0002,
    );
    assert!((estimate - 0.0001).abs() < 1e-12);
}

#[test]
fn test_satisfies_requires_every_capability() {
    let caps = caps(0.001)
        .with_capability(Capability::Handwriting)
        .with_capability(Capability::LanguageDetection);

    let required: BTreeSet<_> = [Capability::Handwriting].into_iter().collect();
    assert!(caps.satisfies(&required));

    let required: BTreeSet<_> = [Capability::Handwriting, Capability::Vision]
        .into_iter()
        .collect();
    assert!(!caps.satisfies(&required));
}

#[test]
fn test_matched_count() {
    let caps = caps(0.001).with_features(
        [Capability::Vision, Capability::StructuredOutput]
            .into_iter()
            .collect::<ProviderFeatures>(),
    );
    let wanted: BTreeSet<_> = [
        Capability::Vision,
        Capability::Streaming,
        Capability::StructuredOutput,
    ]
    .into_iter()
    .collect();
    assert_eq!(caps.matched_count(&wanted), 2);
}

#[test]
fn test_accepts_input_respects_limit() {
    let unlimited = caps(0.001);
    assert!(unlimited.accepts_input(u64::MAX));

    let limited = caps(0.001).with_max_input_bytes(1024);
    assert!(limited.accepts_input(1024));
    assert!(!limited.accepts_input(1025));
}

#[test]
fn test_validate_rejects_negative_cost() {
    assert!(caps(0.001).validate().is_ok());
    assert!(caps(-0.5).validate().is_err());
    assert!(caps(f64::NAN).validate().is_err());
    assert!(caps(0.001).with_cost_per_input_unit(-1.0).validate().is_err());
}

#[test]
fn test_capabilities_serialize_response_time_as_millis() {
    let caps = caps(0.002).with_capability(Capability::Vision);
    let json = serde_json::to_value(&caps).expect("serialization should succeed");
    assert_eq!(json["average_response_time"], 250);
    assert_eq!(json["features"]["vision"], true);

    let back: ProviderCapabilities =
        serde_json::from_value(json).expect("deserialization should succeed");
    assert_eq!(back, caps);
}

#[test]
fn test_capability_names_match_serde() {
    for capability in Capability::ALL {
        let json = serde_json::to_string(&capability).expect("serialization should succeed");
        assert_eq!(json, format!("\"{}\"", capability.as_str()));
    }
}
