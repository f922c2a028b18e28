//! Domain constants
//!
//! Tuning defaults for cost estimation, balanced ranking and retries.
//! Every value here can be overridden through configuration.

// ============================================================================
// COST CONSTANTS
// ============================================================================

/// Bytes in one MiB
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Payload size above which the size surcharge applies (1 MiB)
pub const SIZE_SURCHARGE_THRESHOLD_BYTES: u64 = BYTES_PER_MIB;

/// Surcharge per MiB beyond the threshold, in currency units
pub const DEFAULT_SIZE_SURCHARGE_PER_MIB: f64 = 0.0001;

// ============================================================================
// BALANCED STRATEGY WEIGHTS
// ============================================================================

/// Weight of normalized speed in the balanced composite
pub const BALANCED_SPEED_WEIGHT: f64 = 0.4;

/// Weight of normalized (inverse) cost in the balanced composite
pub const BALANCED_COST_WEIGHT: f64 = 0.3;

/// Weight of reliability in the balanced composite
pub const BALANCED_RELIABILITY_WEIGHT: f64 = 0.3;

// ============================================================================
// EXECUTION CONSTANTS
// ============================================================================

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Upper bound accepted for configured retries
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// Reliability reported by adapters that do not override it
pub const DEFAULT_RELIABILITY_SCORE: f64 = 1.0;

// ============================================================================
// HEALTH CONSTANTS
// ============================================================================

/// Status text for health queries against unknown provider names
pub const PROVIDER_NOT_FOUND_STATUS: &str = "Provider not found";
