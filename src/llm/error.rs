//! Completion-service error types.
//!
//! Failures talking to the completion service: transport problems,
//! provider-reported errors, and malformed responses.

use std::fmt;
use std::time::Duration;

/// Errors that can occur while requesting a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LLMError {
    /// The specific error that occurred
    pub kind: LLMErrorKind,
}

/// Specific completion-service error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LLMErrorKind {
    /// Network error when communicating with the API
    Network {
        /// Description of the network error
        message: String,
    },
    /// Rate limit exceeded
    RateLimited {
        /// Time the provider asked us to wait
        retry_after: Duration,
    },
    /// API returned an error response
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
        /// Error type from the API (if available)
        error_type: Option<String>,
    },
    /// Authentication failed
    AuthenticationFailed {
        /// Reason for authentication failure
        reason: String,
    },
    /// The provider rejected the request shape
    InvalidRequest {
        /// Description of what was invalid
        reason: String,
    },
    /// Response body could not be decoded
    ParseError {
        /// Description of the parse error
        message: String,
    },
    /// Client configuration is unusable
    InvalidConfig {
        /// The configuration field that was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },
    /// Model overloaded or unavailable
    ModelOverloaded {
        /// The model that was overloaded
        model: String,
    },
    /// Request timeout
    Timeout {
        /// The timeout duration that was exceeded
        duration: Duration,
    },
}

impl LLMError {
    /// Creates a new LLMError with the given kind.
    #[must_use]
    pub fn new(kind: LLMErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::Network {
            message: message.into(),
        })
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(retry_after: Duration) -> Self {
        Self::new(LLMErrorKind::RateLimited { retry_after })
    }

    /// Creates an API error.
    #[must_use]
    pub fn api_error(
        status_code: u16,
        message: impl Into<String>,
        error_type: Option<String>,
    ) -> Self {
        Self::new(LLMErrorKind::ApiError {
            status_code,
            message: message.into(),
            error_type,
        })
    }

    /// Creates an authentication failed error.
    #[must_use]
    pub fn authentication_failed(reason: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::AuthenticationFailed {
            reason: reason.into(),
        })
    }

    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::InvalidRequest {
            reason: reason.into(),
        })
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::ParseError {
            message: message.into(),
        })
    }

    /// Creates an invalid config error.
    #[must_use]
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Creates a model overloaded error.
    #[must_use]
    pub fn model_overloaded(model: impl Into<String>) -> Self {
        Self::new(LLMErrorKind::ModelOverloaded {
            model: model.into(),
        })
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(duration: Duration) -> Self {
        Self::new(LLMErrorKind::Timeout { duration })
    }

    /// Returns true if repeating the same request later could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            LLMErrorKind::Network { .. }
                | LLMErrorKind::RateLimited { .. }
                | LLMErrorKind::ModelOverloaded { .. }
                | LLMErrorKind::Timeout { .. }
                | LLMErrorKind::ApiError {
                    status_code: 500..=599,
                    ..
                }
        )
    }
}

impl fmt::Display for LLMError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LLMErrorKind::Network { message } => {
                write!(f, "network error: {message}; check your connection")
            }
            LLMErrorKind::RateLimited { retry_after } => write!(
                f,
                "rate limited; retry after {} seconds",
                retry_after.as_secs()
            ),
            LLMErrorKind::ApiError {
                status_code,
                message,
                error_type,
            } => match error_type {
                Some(kind) => write!(f, "API error {status_code} ({kind}): {message}"),
                None => write!(f, "API error {status_code}: {message}"),
            },
            LLMErrorKind::AuthenticationFailed { reason } => write!(
                f,
                "authentication failed: {reason}; check ANTHROPIC_API_KEY"
            ),
            LLMErrorKind::InvalidRequest { reason } => {
                write!(f, "invalid request: {reason}")
            }
            LLMErrorKind::ParseError { message } => {
                write!(f, "failed to parse completion response: {message}")
            }
            LLMErrorKind::InvalidConfig { field, reason } => {
                write!(f, "invalid client configuration '{field}': {reason}")
            }
            LLMErrorKind::ModelOverloaded { model } => {
                write!(f, "model '{model}' is overloaded; try again shortly")
            }
            LLMErrorKind::Timeout { duration } => write!(
                f,
                "completion request timed out after {} seconds",
                duration.as_secs()
            ),
        }
    }
}

impl std::error::Error for LLMError {}
