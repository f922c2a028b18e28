//! Unit tests for health snapshots

use arbiter_domain::constants::PROVIDER_NOT_FOUND_STATUS;
use arbiter_domain::value_objects::HealthStatus;
use chrono::{Duration as ChronoDuration, Utc};
use std::time::Duration;

#[test]
fn test_not_found_is_unhealthy() {
    let status = HealthStatus::not_found("NoSuchProvider");
    assert!(!status.healthy);
    assert_eq!(status.status, PROVIDER_NOT_FOUND_STATUS);
    assert_eq!(status.provider, "NoSuchProvider");
}

#[test]
fn test_age_is_relative_to_now() {
    let checked = Utc::now() - ChronoDuration::seconds(30);
    let status = HealthStatus::healthy("OpenAI").checked_at(checked);
    let age = status.age(checked + ChronoDuration::seconds(30));
    assert_eq!(age, Duration::from_secs(30));
}

#[test]
fn test_future_timestamp_has_zero_age() {
    let now = Utc::now();
    let status = HealthStatus::healthy("OpenAI").checked_at(now + ChronoDuration::seconds(5));
    assert_eq!(status.age(now), Duration::ZERO);
}

#[test]
fn test_builders() {
    let status = HealthStatus::unhealthy("Tesseract", "binary missing")
        .with_response_time(Duration::from_millis(12))
        .with_status("binary not on PATH");
    assert_eq!(status.response_time, Some(Duration::from_millis(12)));
    assert_eq!(status.status, "binary not on PATH");
}
