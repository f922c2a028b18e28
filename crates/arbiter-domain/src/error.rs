//! Error handling types

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed source error carried by some variants
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for provider routing and execution
#[derive(Error, Debug)]
pub enum Error {
    /// No registered provider satisfies the request, or none is available
    #[error("No suitable provider: {message}")]
    NoSuitableProvider {
        /// Why the candidate set was empty
        message: String,
    },

    /// A configured provider name did not resolve through the registry
    #[error("Provider not found: {name}")]
    ProviderNotFound {
        /// The name as it was configured
        name: String,
    },

    /// A provider call failed during an attempt
    #[error("Provider '{provider}' failed: {message}")]
    Execution {
        /// Provider that raised the failure
        provider: String,
        /// Description of the failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedError>,
    },

    /// A provider call exceeded its time budget
    #[error("Provider '{provider}' timed out after {timeout:?}")]
    Timeout {
        /// Provider that timed out
        provider: String,
        /// The budget that was exceeded
        timeout: Duration,
    },

    /// Caller-initiated cancellation
    #[error("Operation cancelled")]
    Cancelled,

    /// Structurally invalid configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<BoxedError>,
    },

    /// Internal invariant violation
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl Error {
    /// Create a no-suitable-provider error
    pub fn no_suitable_provider<S: Into<String>>(message: S) -> Self {
        Self::NoSuitableProvider {
            message: message.into(),
        }
    }

    /// Create a provider-not-found error
    pub fn provider_not_found<S: Into<String>>(name: S) -> Self {
        Self::ProviderNotFound { name: name.into() }
    }

    /// Create an execution error
    pub fn execution<P: Into<String>, S: Into<String>>(provider: P, message: S) -> Self {
        Self::Execution {
            provider: provider.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an execution error with source
    pub fn execution_with_source<P, S, E>(provider: P, message: S, source: E) -> Self
    where
        P: Into<String>,
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Execution {
            provider: provider.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a timeout error
    pub fn timeout<P: Into<String>>(provider: P, timeout: Duration) -> Self {
        Self::Timeout {
            provider: provider.into(),
            timeout,
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification helpers
impl Error {
    /// Stable snake_case name of the error kind
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::NoSuitableProvider { .. } => "no_suitable_provider",
            Self::ProviderNotFound { .. } => "provider_not_found",
            Self::Execution { .. } => "execution",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled => "cancelled",
            Self::Configuration { .. } => "configuration",
            Self::Internal { .. } => "internal",
        }
    }

    /// Whether this error is a caller cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether a failed attempt with this error may be retried
    ///
    /// Only adapter failures and timeouts are transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Execution { .. } | Self::Timeout { .. })
    }

    /// Kind-prefixed message used when an attempt failure is captured
    pub fn summary(&self) -> String {
        format!("{}: {}", self.kind_str(), self)
    }
}
