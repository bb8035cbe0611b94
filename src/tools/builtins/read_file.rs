//! Read file built-in tool.
//!
//! Reads one text file inside the sandbox, truncating very large files.

use crate::tools::error::IoOperation;
use crate::tools::security::Sandbox;
use crate::tools::{ToolDefinition, ToolError};
use serde::Deserialize;
use serde_json::json;
use tokio::io::AsyncReadExt;

/// Characters returned before truncation.
pub const MAX_CHARS: usize = 100_000;

/// Appended when a file is cut short.
pub const TRUNCATION_NOTICE: &str = "\n\n... (truncated, file is too large)";

/// Bytes read from disk; enough to hold `MAX_CHARS` of any UTF-8 text plus one.
const READ_CAP_BYTES: u64 = (MAX_CHARS as u64 + 1) * 4;

/// Arguments for `read_file`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadFileArgs {
    /// Path relative to the repository root
    pub path: String,
}

/// Returns the tool definition.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "read_file".to_string(),
        description: "Read a single text file (UTF-8). Use after search to inspect implementation \
                      details. Do not read large/binary files; read only the minimum needed for \
                      the task."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Relative path from repository root"
                }
            },
            "required": ["path"]
        }),
    }
}

/// Reads the file, decoding invalid UTF-8 lossily.
///
/// # Errors
///
/// Returns `ToolError` for sandbox violations, missing files, directories,
/// and I/O failures.
pub async fn run(args: &ReadFileArgs, sandbox: &Sandbox) -> Result<String, ToolError> {
    let path = sandbox.resolve(&args.path)?;

    let metadata = match tokio::fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ToolError::not_found(&args.path));
        }
        Err(e) => return Err(ToolError::io(IoOperation::Read, e.to_string())),
    };
    if metadata.is_dir() {
        return Err(ToolError::is_directory(&args.path));
    }

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| ToolError::io(IoOperation::Read, e.to_string()))?;
    let mut bytes = Vec::new();
    file.take(READ_CAP_BYTES)
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| ToolError::io(IoOperation::Read, e.to_string()))?;

    Ok(truncate(&String::from_utf8_lossy(&bytes)))
}

fn truncate(content: &str) -> String {
    match content.char_indices().nth(MAX_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_NOTICE}", &content[..cut]),
        None => content.to_string(),
    }
}
