//! Tool error types.
//!
//! Errors raised by tool parsing and execution. None of these escape the
//! registry: [`ToolError::to_result_text`] renders each one as the text the
//! model receives in its tool result.

use crate::tools::security::SandboxError;
use std::fmt;

/// Errors that can occur while dispatching or executing a tool.
///
/// This type uses Box<ToolErrorKind> to keep the error size small,
/// enabling efficient use in Result types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolError {
    kind: Box<ToolErrorKind>,
}

/// Which filesystem operation an I/O failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOperation {
    /// Reading a file
    Read,
    /// Writing a file
    Write,
    /// Anything else (listing, appending)
    Other,
}

/// Specific tool error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolErrorKind {
    /// No tool with this name exists
    UnknownTool {
        /// The name the model asked for
        name: String,
        /// A close known name, if any
        suggestion: Option<String>,
    },
    /// A mutating tool was called on a read-only registry
    Disabled {
        /// The tool that was refused
        name: String,
    },
    /// Input did not match the tool's schema
    InvalidArguments {
        /// The name of the tool
        tool_name: String,
        /// What was invalid
        reason: String,
    },
    /// A sandbox check failed
    Sandbox(SandboxError),
    /// The requested file does not exist
    NotFound {
        /// Path as given by the model
        path: String,
    },
    /// The requested path is a directory
    IsDirectory {
        /// Path as given by the model
        path: String,
    },
    /// A filesystem operation failed
    Io {
        /// Which operation failed
        operation: IoOperation,
        /// Description of the failure
        reason: String,
    },
    /// A delegated sub-agent could not finish
    Delegation {
        /// Description of the failure
        reason: String,
    },
}

impl ToolError {
    /// Creates a new ToolError with the given kind.
    #[must_use]
    pub fn new(kind: ToolErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
        }
    }

    /// Returns a reference to the error kind.
    #[must_use]
    pub fn kind(&self) -> &ToolErrorKind {
        &self.kind
    }

    /// Creates an unknown tool error.
    #[must_use]
    pub fn unknown_tool(name: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::new(ToolErrorKind::UnknownTool {
            name: name.into(),
            suggestion,
        })
    }

    /// Creates a disabled tool error.
    #[must_use]
    pub fn disabled(name: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Disabled { name: name.into() })
    }

    /// Creates an invalid arguments error.
    #[must_use]
    pub fn invalid_arguments(tool_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArguments {
            tool_name: tool_name.into(),
            reason: reason.into(),
        })
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::NotFound { path: path.into() })
    }

    /// Creates an is-a-directory error.
    #[must_use]
    pub fn is_directory(path: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::IsDirectory { path: path.into() })
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(operation: IoOperation, reason: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Io {
            operation,
            reason: reason.into(),
        })
    }

    /// Creates a delegation error.
    #[must_use]
    pub fn delegation(reason: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Delegation {
            reason: reason.into(),
        })
    }

    /// Returns true if this error is a sandbox violation.
    #[must_use]
    pub fn is_sandbox_violation(&self) -> bool {
        matches!(*self.kind, ToolErrorKind::Sandbox(_))
    }

    /// Returns true if the tool name was not recognized.
    #[must_use]
    pub fn is_unknown_tool(&self) -> bool {
        matches!(*self.kind, ToolErrorKind::UnknownTool { .. })
    }

    /// Renders the error as tool-result text for the model.
    #[must_use]
    pub fn to_result_text(&self) -> String {
        match self.kind.as_ref() {
            ToolErrorKind::UnknownTool { name, suggestion } => match suggestion {
                Some(close) => format!("Unknown tool: {name} (did you mean '{close}'?)"),
                None => format!("Unknown tool: {name}"),
            },
            ToolErrorKind::NotFound { path } => format!("(file not found: {path})"),
            ToolErrorKind::IsDirectory { path } => format!("(path is a directory: {path})"),
            ToolErrorKind::Io {
                operation: IoOperation::Read,
                reason,
            } => format!("(error reading file: {reason})"),
            ToolErrorKind::Io {
                operation: IoOperation::Write,
                reason,
            } => format!("(error writing file: {reason})"),
            ToolErrorKind::Delegation { reason } => format!("[Sub-agent error: {reason}]"),
            _ => format!("(error: {self})"),
        }
    }
}

impl From<SandboxError> for ToolError {
    fn from(error: SandboxError) -> Self {
        Self::new(ToolErrorKind::Sandbox(error))
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind.as_ref() {
            ToolErrorKind::UnknownTool { name, .. } => write!(f, "unknown tool '{name}'"),
            ToolErrorKind::Disabled { name } => {
                write!(f, "tool '{name}' is not available in read-only mode")
            }
            ToolErrorKind::InvalidArguments { tool_name, reason } => {
                write!(f, "invalid arguments for {tool_name}: {reason}")
            }
            ToolErrorKind::Sandbox(error) => write!(f, "{error}"),
            ToolErrorKind::NotFound { path } => write!(f, "file not found: {path}"),
            ToolErrorKind::IsDirectory { path } => write!(f, "path is a directory: {path}"),
            ToolErrorKind::Io { reason, .. } => write!(f, "{reason}"),
            ToolErrorKind::Delegation { reason } => write!(f, "sub-agent failed: {reason}"),
        }
    }
}

impl std::error::Error for ToolError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn unknown_tool_text() {
        assert_eq!(
            ToolError::unknown_tool("frobnicate", None).to_result_text(),
            "Unknown tool: frobnicate"
        );
        assert_eq!(
            ToolError::unknown_tool("read_files", Some("read_file".into())).to_result_text(),
            "Unknown tool: read_files (did you mean 'read_file'?)"
        );
    }

    #[test]
    fn sandbox_errors_render_with_error_prefix() {
        let error: ToolError = SandboxError::Traversal {
            requested: "../x".into(),
        }
        .into();
        assert!(error.is_sandbox_violation());
        assert_eq!(error.to_result_text(), "(error: Path traversal detected: ../x)");
    }

    #[test]
    fn write_blocked_keeps_multiline_message() {
        let error: ToolError = SandboxError::WriteOutsideRoot {
            attempted: PathBuf::from("/repo/src/a.py"),
            allowed: PathBuf::from("/repo/workspace"),
        }
        .into();
        let text = error.to_result_text();
        assert!(text.starts_with("(error: Write blocked: path outside workspace\n"));
        assert!(text.ends_with("(Set AGENT_WRITE_ROOT env var to change))"));
    }

    #[test]
    fn resource_errors_use_their_own_wording() {
        assert_eq!(
            ToolError::not_found("a.py").to_result_text(),
            "(file not found: a.py)"
        );
        assert_eq!(
            ToolError::is_directory("src").to_result_text(),
            "(path is a directory: src)"
        );
        assert_eq!(
            ToolError::io(IoOperation::Read, "permission denied").to_result_text(),
            "(error reading file: permission denied)"
        );
        assert_eq!(
            ToolError::io(IoOperation::Write, "disk full").to_result_text(),
            "(error writing file: disk full)"
        );
    }

    #[test]
    fn disabled_and_invalid_arguments_text() {
        assert_eq!(
            ToolError::disabled("write_file").to_result_text(),
            "(error: tool 'write_file' is not available in read-only mode)"
        );
        assert_eq!(
            ToolError::invalid_arguments("read_file", "missing field `path`").to_result_text(),
            "(error: invalid arguments for read_file: missing field `path`)"
        );
    }

    #[test]
    fn delegation_errors_use_sub_agent_marker() {
        assert_eq!(
            ToolError::delegation("boom").to_result_text(),
            "[Sub-agent error: boom]"
        );
    }
}
