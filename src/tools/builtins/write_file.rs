//! Write file built-in tool.
//!
//! Creates or overwrites one text file. The target must resolve inside the
//! sandbox and inside the write root.

use crate::tools::error::IoOperation;
use crate::tools::security::Sandbox;
use crate::tools::{ToolDefinition, ToolError};
use serde::Deserialize;
use serde_json::json;

/// Arguments for `write_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteFileArgs {
    /// Path relative to the repository root
    pub path: String,
    /// Full file content
    pub content: String,
}

/// Returns the tool definition.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "write_file".to_string(),
        description: "Create or overwrite a small text file (UTF-8). Keep changes minimal and \
                      follow existing patterns."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path from repository root"
                },
                "content": {
                    "type": "string",
                    "description": "Full content to write to the file"
                }
            },
            "required": ["path", "content"]
        }),
    }
}

/// Writes the file, creating parent directories.
///
/// # Errors
///
/// Returns `ToolError` for sandbox violations and I/O failures. Nothing is
/// written when a sandbox check fails.
pub async fn run(args: &WriteFileArgs, sandbox: &Sandbox) -> Result<String, ToolError> {
    let path = sandbox.resolve(&args.path)?;
    let path = sandbox.check_writable(&path)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| ToolError::io(IoOperation::Write, e.to_string()))?;
    }
    tokio::fs::write(&path, &args.content)
        .await
        .map_err(|e| ToolError::io(IoOperation::Write, e.to_string()))?;

    tracing::debug!(path = %path.display(), bytes = args.content.len(), "file written");
    Ok(format!(
        "(successfully wrote {} bytes to {})",
        args.content.len(),
        args.path
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(path: &str, content: &str) -> WriteFileArgs {
        WriteFileArgs {
            path: path.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn writes_inside_write_root_creating_parents() {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path(), "workspace").unwrap();

        let text = run(&args("workspace/notes/plan.md", "step one"), &sandbox)
            .await
            .unwrap();

        assert_eq!(text, "(successfully wrote 8 bytes to workspace/notes/plan.md)");
        let written = fs::read_to_string(dir.path().join("workspace/notes/plan.md")).unwrap();
        assert_eq!(written, "step one");
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("workspace")).unwrap();
        fs::write(dir.path().join("workspace/a.txt"), "old").unwrap();
        let sandbox = Sandbox::new(dir.path(), "workspace").unwrap();

        run(&args("workspace/a.txt", "new"), &sandbox).await.unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("workspace/a.txt")).unwrap(),
            "new"
        );
    }

    #[tokio::test]
    async fn readable_path_outside_write_root_is_blocked() {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path(), "workspace").unwrap();

        let error = run(&args("src/evil.py", "x"), &sandbox).await.unwrap_err();

        assert!(error.to_result_text().starts_with("(error:"));
        assert!(!dir.path().join("src/evil.py").exists());
        assert!(!dir.path().join("src").exists());
    }

    #[tokio::test]
    async fn traversal_is_blocked_before_write_check() {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path(), "workspace").unwrap();

        let error = run(&args("../outside.txt", "x"), &sandbox).await.unwrap_err();
        assert_eq!(
            error.to_result_text(),
            "(error: Path traversal detected: ../outside.txt)"
        );
    }

    #[tokio::test]
    async fn reports_utf8_byte_length() {
        let dir = TempDir::new().unwrap();
        let sandbox = Sandbox::new(dir.path(), "workspace").unwrap();

        let text = run(&args("workspace/u.txt", "héllo"), &sandbox).await.unwrap();
        assert_eq!(text, "(successfully wrote 6 bytes to workspace/u.txt)");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_cannot_redirect_a_write() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("workspace")).unwrap();
        let target = outside.path().join("pwned.txt");
        std::os::unix::fs::symlink(&target, dir.path().join("workspace/link.txt")).unwrap();
        let sandbox = Sandbox::new(dir.path(), "workspace").unwrap();

        let error = run(&args("workspace/link.txt", "x"), &sandbox).await.unwrap_err();

        assert!(error.to_result_text().starts_with("(error: Path traversal detected"));
        assert!(!target.exists());
    }
}
