//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain tuning defaults are defined in `arbiter_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "arbiter.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "arbiter";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "ARBITER";

/// Separator between nested keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_ENV_FILTER: &str = "ARBITER_LOG";

/// Default log file stem when rotating to a file
pub const LOG_FILE_STEM: &str = "arbiter";

// ============================================================================
// COST CONSTANTS
// ============================================================================

/// How long cost records are kept before lazy pruning (24 hours)
pub const COST_RETENTION_SECS: u64 = 24 * 60 * 60;

/// Default reporting window (1 hour)
pub const COST_DEFAULT_WINDOW_SECS: u64 = 60 * 60;

// ============================================================================
// HEALTH CONSTANTS
// ============================================================================

/// Cached health snapshots younger than this are served without a live check
pub const HEALTH_TTL_SECS: u64 = 60;

/// Time budget of one live health check
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// RETRY CONSTANTS
// ============================================================================

/// Delay before the first retry; doubles on every further retry
pub const RETRY_BASE_DELAY_MS: u64 = 1000;

/// Upper bound on a single backoff wait
pub const RETRY_MAX_DELAY_MS: u64 = 30_000;

// ============================================================================
// PIPELINE NAMES
// ============================================================================

/// Pipeline key used by the text extraction service
pub const TEXT_EXTRACTION_PIPELINE: &str = "text_extraction";

/// Pipeline key used by the completion service
pub const COMPLETION_PIPELINE: &str = "completion";
