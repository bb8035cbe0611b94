//! Built-in tools.
//!
//! Each submodule provides one tool: its argument type, its definition as
//! presented to the model, and a `run` function. Dispatch and permission
//! checks live in [`ToolRegistry`](crate::tools::ToolRegistry); the tools
//! themselves only do the work.
//!
//! ## Available Tools
//!
//! | Tool | Mutating | Description |
//! |------|----------|-------------|
//! | `ask_user` | No | Relay a clarifying question to the operator |
//! | `search_files` | No | Find files by glob pattern |
//! | `search_in_files` | No | Find lines containing a substring |
//! | `read_file` | No | Read one text file |
//! | `write_file` | Yes | Create or overwrite one text file |
//! | `save_memory` | Yes | Append a note to `AGENTS.md` |
//! | `delegate_task` | No | Hand a sub-task to a read-only sub-agent |

pub mod ask_user;
pub mod delegate_task;
pub mod read_file;
pub mod save_memory;
pub mod search_files;
pub mod search_in_files;
pub mod write_file;

use crate::tools::error::IoOperation;
use crate::tools::security::{Sandbox, SandboxError};
use crate::tools::{ToolError, ToolKind};
use std::path::{Component, Path, PathBuf};

/// Result text of a search that matched nothing.
pub const NO_MATCHES: &str = "(no matches found)";

/// Expands `pattern` under the sandbox root.
///
/// Hidden entries only match when the pattern names the leading dot, and `*`
/// never crosses a directory separator. Matches that resolve outside the
/// root through symlinks are dropped. The result is sorted.
pub(crate) fn glob_under(
    sandbox: &Sandbox,
    pattern: &str,
    tool: ToolKind,
) -> Result<Vec<PathBuf>, ToolError> {
    let escapes = Path::new(pattern)
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(SandboxError::Traversal {
            requested: pattern.to_string(),
        }
        .into());
    }

    let root = sandbox.root();
    let full = format!(
        "{}{}{pattern}",
        glob::Pattern::escape(&root.to_string_lossy()),
        std::path::MAIN_SEPARATOR
    );
    let options = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let entries = glob::glob_with(&full, options)
        .map_err(|e| ToolError::invalid_arguments(tool.name(), format!("invalid glob pattern: {e}")))?;

    let mut matches = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => match path.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => matches.push(path),
                Ok(canonical) => {
                    tracing::debug!(path = %canonical.display(), "glob match outside root dropped");
                }
                Err(e) => tracing::debug!(path = %path.display(), error = %e, "glob match unresolvable"),
            },
            Err(e) => tracing::debug!(error = %e, "glob entry unreadable"),
        }
    }
    matches.sort();
    Ok(matches)
}

/// Runs blocking filesystem work off the async executor.
pub(crate) async fn run_blocking<F>(work: F) -> Result<String, ToolError>
where
    F: FnOnce() -> Result<String, ToolError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ToolError::io(IoOperation::Other, format!("search task failed: {e}")))?
}
