//! Top-level error type for the coding agent.
//!
//! Tool failures never reach this type: the tool registry turns them into
//! result text for the model. `AgentError` covers what can go wrong before
//! a conversation starts (configuration, workspace preparation, logging) and
//! completion-service failures surfaced to the caller.
//!
//! No external error crates (anyhow, thiserror, eyre) are used.

use crate::llm::LLMError;
use crate::logging::LoggingError;
use std::fmt;
use std::path::PathBuf;

/// Errors surfaced to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentError {
    /// The specific error that occurred
    pub kind: AgentErrorKind,
}

/// Specific agent error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentErrorKind {
    /// A required credential was not supplied
    MissingCredential {
        /// Environment variable that should hold it
        variable: String,
    },
    /// Configuration value was present but unusable
    Configuration {
        /// Description of what was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },
    /// The completion service failed
    Llm(LLMError),
    /// The repository or a copy of it could not be prepared
    Workspace {
        /// Path involved
        path: PathBuf,
        /// Why it failed
        reason: String,
    },
    /// Tracing subscriber setup failed
    Logging {
        /// Why it failed
        reason: String,
    },
}

impl AgentError {
    /// Creates a new AgentError with the given kind.
    #[must_use]
    pub fn new(kind: AgentErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a missing credential error.
    #[must_use]
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::MissingCredential {
            variable: variable.into(),
        })
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Configuration {
            field: field.into(),
            reason: reason.into(),
        })
    }

    /// Creates a workspace error.
    #[must_use]
    pub fn workspace(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Workspace {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Creates a logging error.
    #[must_use]
    pub fn logging(reason: impl Into<String>) -> Self {
        Self::new(AgentErrorKind::Logging {
            reason: reason.into(),
        })
    }

    /// Returns true if this error stems from configuration rather than runtime.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self.kind,
            AgentErrorKind::MissingCredential { .. } | AgentErrorKind::Configuration { .. }
        )
    }
}

impl From<LLMError> for AgentError {
    fn from(error: LLMError) -> Self {
        Self::new(AgentErrorKind::Llm(error))
    }
}

impl From<LoggingError> for AgentError {
    fn from(error: LoggingError) -> Self {
        Self::logging(error.to_string())
    }
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AgentErrorKind::MissingCredential { variable } => {
                write!(f, "{variable} environment variable not set")
            }
            AgentErrorKind::Configuration { field, reason } => {
                write!(f, "configuration error for '{field}': {reason}")
            }
            AgentErrorKind::Llm(error) => write!(f, "{error}"),
            AgentErrorKind::Workspace { path, reason } => write!(
                f,
                "cannot prepare repository '{}': {reason}",
                path.display()
            ),
            AgentErrorKind::Logging { reason } => {
                write!(f, "failed to initialize logging: {reason}")
            }
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            AgentErrorKind::Llm(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_variable() {
        let error = AgentError::missing_credential("ANTHROPIC_API_KEY");
        assert_eq!(
            error.to_string(),
            "ANTHROPIC_API_KEY environment variable not set"
        );
        assert!(error.is_configuration());
    }

    #[test]
    fn llm_errors_convert_and_keep_source() {
        let error: AgentError = LLMError::network("connection reset").into();
        assert!(!error.is_configuration());
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().contains("connection reset"));
    }

    #[test]
    fn workspace_error_shows_path() {
        let error = AgentError::workspace("/tmp/missing", "does not exist");
        assert!(error.to_string().contains("/tmp/missing"));
    }
}
