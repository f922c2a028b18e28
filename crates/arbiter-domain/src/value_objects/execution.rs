//! Uniform execution result

use serde::{Deserialize, Serialize};

/// Outcome of a pipeline run: a payload or error messages, never both
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionResult<T> {
    /// The call succeeded
    Success(T),
    /// The call failed; holds at least one message
    Failure(Vec<String>),
}

impl<T> ExecutionResult<T> {
    /// Create a failure carrying a single message
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(vec![message.into()])
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Borrow the payload, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Error messages; empty on success
    pub fn errors(&self) -> &[String] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(errors) => errors,
        }
    }

    /// The first error message, if any
    pub fn error(&self) -> Option<&str> {
        self.errors().first().map(String::as_str)
    }

    /// Transform the payload
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ExecutionResult<U> {
        match self {
            Self::Success(value) => ExecutionResult::Success(f(value)),
            Self::Failure(errors) => ExecutionResult::Failure(errors),
        }
    }

    /// Convert into a std `Result`, joining error messages
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(errors) => Err(errors.join("; ")),
        }
    }
}

impl<T> From<Result<T, String>> for ExecutionResult<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(message) => Self::failure(message),
        }
    }
}
