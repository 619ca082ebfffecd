//! Error types.
//!
//! `ProviderError` lives here rather than in `iaprof-providers` so the
//! mentor can downcast and classify failures for retry decisions without
//! string matching.

use thiserror::Error;

use crate::model::AppMode;

/// Errors that can occur when interacting with a generative-model provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        match self {
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_) => true,
            // 4xx other than 429 will not improve on retry
            ProviderError::ApiError { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// The model answered, but not with something we can use.
#[derive(Debug, Error)]
pub enum MentorError {
    #[error("{operation}: model reply is not valid JSON: {source}")]
    InvalidJson {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: {reason}")]
    Malformed {
        operation: &'static str,
        reason: String,
    },
}

/// A session operation was called in a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a study goal is required")]
    MissingGoal,

    #[error("a course must be selected")]
    MissingCourse,

    #[error("cannot go from {from} to {to}")]
    InvalidTransition { from: AppMode, to: AppMode },

    #[error("no question is being answered")]
    NoCurrentQuestion,

    #[error("fixation content must be acknowledged first")]
    FixationPending,

    #[error("option {index} does not exist (question has {options} options)")]
    OptionOutOfRange { index: usize, options: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanent_errors() {
        assert!(ProviderError::AuthenticationFailed("x".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("m".into()).is_permanent());
        assert!(ProviderError::ApiError {
            status: 400,
            message: "bad schema".into()
        }
        .is_permanent());
        assert!(!ProviderError::ApiError {
            status: 503,
            message: "overloaded".into()
        }
        .is_permanent());
        assert!(!ProviderError::Timeout(30).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 1 }.is_permanent());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        assert_eq!(
            ProviderError::RateLimited {
                retry_after_ms: 5000
            }
            .retry_after_ms(),
            Some(5000)
        );
        assert_eq!(ProviderError::NetworkError("x".into()).retry_after_ms(), None);
    }

    #[test]
    fn session_error_messages() {
        let err = SessionError::InvalidTransition {
            from: AppMode::Welcome,
            to: AppMode::Report,
        };
        assert_eq!(err.to_string(), "cannot go from welcome to report");
    }
}
