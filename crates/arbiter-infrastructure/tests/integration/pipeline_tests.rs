//! Integration tests for the retry-then-fallback execution pipeline
//!
//! Tests run on a paused clock so backoff waits complete instantly while
//! still advancing virtual time.

use crate::test_utils::{LogCapture, MockProvider, ocr_registry, ocr_routing};
use arbiter_domain::constants::BYTES_PER_MIB;
use arbiter_domain::error::{Error, Result};
use arbiter_domain::ports::{ImageInput, OcrOutput, OcrProvider};
use arbiter_domain::value_objects::{Capability, ExecutionResult, RequestDescriptor};
use arbiter_infrastructure::config::{AppConfig, CostConfig, PipelineConfig};
use arbiter_infrastructure::pipeline::{
    BackoffPolicy, ExecutionPipeline, ProviderCall, ProviderRouting,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

fn pipeline(
    providers: &[Arc<MockProvider>],
    config: PipelineConfig,
) -> ExecutionPipeline<dyn OcrProvider> {
    ExecutionPipeline::new(
        "text_extraction",
        ocr_routing(providers),
        config,
        BackoffPolicy::default(),
    )
    .expect("pipeline config should be valid")
}

fn request() -> RequestDescriptor {
    RequestDescriptor::new("extract_text").with_payload_bytes(16)
}

async fn run(
    pipeline: &ExecutionPipeline<dyn OcrProvider>,
    request: &RequestDescriptor,
    cancel: &CancellationToken,
) -> Result<ExecutionResult<OcrOutput>> {
    let image = ImageInput::new(vec![0u8; 16], "image/png");
    let image = &image;
    pipeline
        .execute(
            request,
            cancel,
            move |provider: Arc<dyn OcrProvider>, call: ProviderCall| async move {
                provider.extract_text(image, call.model.as_deref()).await
            },
        )
        .await
}

fn answered_by(result: &ExecutionResult<OcrOutput>) -> &str {
    &result.value().expect("expected a successful result").text
}

#[tokio::test(start_paused = true)]
async fn test_primary_succeeds_first_try() {
    let primary = MockProvider::new("Tesseract", 0.002).into_arc();
    let fallback = MockProvider::new("GoogleVision", 0.0015).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&fallback)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_fallback("GoogleVision"),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(answered_by(&result), "Tesseract answered");
    assert_eq!(primary.calls(), 1);
    assert_eq!(fallback.calls(), 0);

    let routing = pipeline.routing();
    let report = routing.costs.generate_cost_report(Duration::from_secs(3600));
    assert_eq!(report.total_requests, 1);
    assert!((report.total_cost - 0.002).abs() < 1e-12);

    let snapshot = routing.health.snapshot("Tesseract").expect("outcome observed");
    assert!(snapshot.healthy);
}

#[tokio::test(start_paused = true)]
async fn test_retries_with_backoff_then_fallback() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let fallback = MockProvider::new("GoogleVision", 0.0015).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&fallback)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_fallback("GoogleVision")
            .with_max_retries(3),
    );

    let started = Instant::now();
    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(answered_by(&result), "GoogleVision answered");
    assert_eq!(primary.calls(), 4);
    assert_eq!(fallback.calls(), 1);
    // 1s + 2s + 4s between the four primary attempts
    assert!(started.elapsed() >= Duration::from_secs(7));

    let health = &pipeline.routing().health;
    assert!(!health.snapshot("Tesseract").unwrap().healthy);
    assert!(health.snapshot("GoogleVision").unwrap().healthy);

    let breakdown = pipeline
        .routing()
        .costs
        .get_cost_breakdown(Duration::from_secs(3600));
    assert!(!breakdown.contains_key("Tesseract"));
    assert!((breakdown["GoogleVision"] - 0.0015).abs() < 1e-12);
}

#[tokio::test(start_paused = true)]
async fn test_recovers_on_later_attempt() {
    let primary = MockProvider::new("Tesseract", 0.002)
        .failing_times(2)
        .into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary)],
        PipelineConfig::new().with_primary("Tesseract"),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(answered_by(&result), "Tesseract answered");
    assert_eq!(primary.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_zero_retries_means_single_attempt() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_max_retries(0),
    );

    let started = Instant::now();
    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_failure());
    assert_eq!(primary.calls(), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_without_fallback_reports_last_error() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary)],
        PipelineConfig::new().with_primary("Tesseract"),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.errors(),
        ["execution: Provider 'Tesseract' failed: scripted failure 4"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_both_exhausted_reports_fallback_error() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let fallback = MockProvider::new("GoogleVision", 0.0015).failing().into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&fallback)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_fallback("GoogleVision")
            .with_max_retries(1),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(primary.calls(), 2);
    assert_eq!(fallback.calls(), 2);
    assert_eq!(
        result.error(),
        Some("execution: Provider 'GoogleVision' failed: scripted failure 2")
    );
}

#[tokio::test(start_paused = true)]
async fn test_unresolvable_fallback_keeps_primary_error() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_fallback("Ghost")
            .with_max_retries(0),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.error(),
        Some("execution: Provider 'Tesseract' failed: scripted failure 1")
    );
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_fallback_is_not_called() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let fallback = MockProvider::new("GoogleVision", 0.0015)
        .unavailable()
        .into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&fallback)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_fallback("GoogleVision")
            .with_max_retries(0),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_failure());
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_primary_delegates_to_selector() {
    let pricey = MockProvider::new("Alpha", 0.02).into_arc();
    let cheap = MockProvider::new("Beta", 0.01).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&pricey), Arc::clone(&cheap)],
        PipelineConfig::new().with_primary("NoSuch"),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(answered_by(&result), "Beta answered");
    assert_eq!(pricey.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_primary_delegates_to_selector() {
    let primary = MockProvider::new("Tesseract", 0.001).unavailable().into_arc();
    let other = MockProvider::new("AzureVision", 0.01).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&other)],
        PipelineConfig::new().with_primary("Tesseract"),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(answered_by(&result), "AzureVision answered");
    assert_eq!(primary.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_primary_resolved_through_alias() {
    let openai = MockProvider::new("OpenAI", 0.03).into_arc();
    let anthropic = MockProvider::new("Anthropic", 0.015).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&anthropic), Arc::clone(&openai)],
        PipelineConfig::new().with_primary("gpt4"),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(answered_by(&result), "OpenAI answered");
    assert_eq!(anthropic.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_suitable_provider_is_a_failure_value() {
    let primary = MockProvider::new("Tesseract", 0.001).into_arc();
    let pipeline = pipeline(&[Arc::clone(&primary)], PipelineConfig::new());
    let request = request().require(Capability::Handwriting);

    let result = run(&pipeline, &request, &CancellationToken::new())
        .await
        .unwrap();

    let message = result.error().expect("failure message");
    assert!(message.contains("No suitable provider"), "{message}");
    assert_eq!(primary.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let fallback = MockProvider::new("GoogleVision", 0.0015).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&fallback)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_fallback("GoogleVision"),
    );
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        trigger.cancel();
    });

    let result = run(&pipeline, &request(), &cancel).await;

    assert!(matches!(result, Err(Error::Cancelled)));
    // attempts at 0s and 1s; the cancel lands inside the 2s wait
    assert_eq!(primary.calls(), 2);
    assert_eq!(fallback.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_before_start() {
    let primary = MockProvider::new("Tesseract", 0.002).into_arc();
    let pipeline = pipeline(&[Arc::clone(&primary)], PipelineConfig::new());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = run(&pipeline, &request(), &cancel).await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(primary.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_aborts_in_flight_attempt() {
    let primary = MockProvider::new("Tesseract", 0.002)
        .with_call_delay(Duration::from_secs(10))
        .into_arc();
    let pipeline = pipeline(&[Arc::clone(&primary)], PipelineConfig::new());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let result = run(&pipeline, &request(), &cancel).await;

    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(primary.calls(), 1);
    assert!(started.elapsed() < Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_attempt_timeout_is_captured() {
    let primary = MockProvider::new("Tesseract", 0.002)
        .with_call_delay(Duration::from_secs(10))
        .into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_max_retries(0)
            .with_timeout_secs(2),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        result.error(),
        Some("timeout: Provider 'Tesseract' timed out after 2s")
    );
}

#[tokio::test(start_paused = true)]
async fn test_adapter_panic_becomes_attempt_failure() {
    let primary = MockProvider::new("Tesseract", 0.002).panicking().into_arc();
    let fallback = MockProvider::new("GoogleVision", 0.0015).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&fallback)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_fallback("GoogleVision")
            .with_max_retries(1),
    );

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(answered_by(&result), "GoogleVision answered");
    assert_eq!(primary.calls(), 2);
    let snapshot = pipeline.routing().health.snapshot("Tesseract").unwrap();
    assert!(snapshot.status.contains("provider panicked: adapter bug"));
}

#[tokio::test(start_paused = true)]
async fn test_models_and_attempts_passed_to_operation() {
    let primary = MockProvider::new("Tesseract", 0.002).failing().into_arc();
    let fallback = MockProvider::new("GoogleVision", 0.0015).into_arc();
    let pipeline = pipeline(
        &[Arc::clone(&primary), Arc::clone(&fallback)],
        PipelineConfig::new()
            .with_primary("Tesseract")
            .with_model("tess-5")
            .with_fallback("GoogleVision")
            .with_fallback_model("vision-pro")
            .with_max_retries(1),
    );
    let calls = Mutex::new(Vec::new());

    let result = pipeline
        .execute(
            &request(),
            &CancellationToken::new(),
            |provider: Arc<dyn OcrProvider>, call: ProviderCall| {
                calls.lock().unwrap().push(call.clone());
                async move {
                    let image = ImageInput::new(vec![1, 2, 3], "image/png");
                    provider.extract_text(&image, call.model.as_deref()).await
                }
            },
        )
        .await
        .unwrap();

    assert!(result.is_success());
    assert_eq!(
        primary.models(),
        [Some("tess-5".to_string()), Some("tess-5".to_string())]
    );
    assert_eq!(fallback.models(), [Some("vision-pro".to_string())]);

    let calls = calls.into_inner().unwrap();
    let summary: Vec<_> = calls
        .iter()
        .map(|c| (c.provider.as_str(), c.attempt, c.fallback))
        .collect();
    assert_eq!(
        summary,
        [
            ("Tesseract", 1, false),
            ("Tesseract", 2, false),
            ("GoogleVision", 1, true),
        ]
    );
}

#[tokio::test]
async fn test_invalid_config_rejected_at_construction() {
    let primary = MockProvider::new("Tesseract", 0.002).into_arc();
    let built = ExecutionPipeline::new(
        "text_extraction",
        ocr_routing(&[primary]),
        PipelineConfig::new().with_max_retries(11),
        BackoffPolicy::default(),
    );

    assert!(matches!(built, Err(Error::Configuration { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_recorded_cost_uses_configured_surcharge() {
    let provider = MockProvider::new("Tesseract", 0.0).into_arc();
    let config = AppConfig {
        cost: CostConfig {
            surcharge_per_mib: 0.01,
            ..CostConfig::default()
        },
        ..AppConfig::default()
    };
    let routing = ProviderRouting::from_config(ocr_registry(&[Arc::clone(&provider)]), &config);
    let pipeline = ExecutionPipeline::new(
        "text_extraction",
        routing,
        PipelineConfig::new(),
        BackoffPolicy::default(),
    )
    .unwrap();
    let request = RequestDescriptor::new("extract_text").with_payload_bytes(3 * BYTES_PER_MIB);

    let result = run(&pipeline, &request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_success());
    let recorded = pipeline
        .routing()
        .costs
        .get_total_cost(Duration::from_secs(3600));
    assert!((recorded - 0.02).abs() < 1e-12, "recorded {recorded}");
}

#[tokio::test(start_paused = true)]
async fn test_selector_delegation_and_failed_attempts_are_logged() {
    let (logs, _guard) = LogCapture::install();
    let provider = MockProvider::new("Tesseract", 0.002)
        .failing_times(1)
        .into_arc();
    let pipeline = pipeline(&[Arc::clone(&provider)], PipelineConfig::new());

    let result = run(&pipeline, &request(), &CancellationToken::new())
        .await
        .unwrap();

    assert!(result.is_success());
    let output = logs.contents();
    assert!(output.contains("No primary provider configured"), "{output}");
    assert!(output.contains("Provider attempt failed"), "{output}");
    assert!(output.contains("transient=true"), "{output}");
}
