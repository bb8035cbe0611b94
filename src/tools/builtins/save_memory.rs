//! Persist a note to the memory file.

use crate::memory::{MemoryStore, MEMORY_FILE_NAME};
use crate::tools::error::IoOperation;
use crate::tools::{ToolDefinition, ToolError};
use serde::Deserialize;
use serde_json::json;

/// Arguments for `save_memory`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SaveMemoryArgs {
    /// The note to keep
    pub content: String,
}

/// Returns the tool definition.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "save_memory".to_string(),
        description: "Save important information, learnings, or decisions to persistent memory. \
                      Use this when you discover key facts about the codebase, user preferences, \
                      project conventions, or other information that should be remembered across \
                      sessions. The content will be appended to AGENTS.md with a timestamp."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "The information to save. Be concise but complete. Include context if needed."
                }
            },
            "required": ["content"]
        }),
    }
}

/// Appends the note.
///
/// # Errors
///
/// Returns `ToolError` if the memory file cannot be written.
pub async fn run(args: &SaveMemoryArgs, memory: &MemoryStore) -> Result<String, ToolError> {
    memory
        .append(&args.content)
        .await
        .map_err(|e| ToolError::io(IoOperation::Other, e.to_string()))?;
    Ok(format!(
        "(saved {} bytes to {MEMORY_FILE_NAME})",
        args.content.len()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn saves_and_reports_size() {
        let dir = TempDir::new().unwrap();
        let memory = MemoryStore::new(dir.path());

        let text = run(
            &SaveMemoryArgs {
                content: "Tests live in tests/".into(),
            },
            &memory,
        )
        .await
        .unwrap();

        assert_eq!(text, "(saved 20 bytes to AGENTS.md)");
        let saved = std::fs::read_to_string(dir.path().join("AGENTS.md")).unwrap();
        assert!(saved.ends_with("\n\nTests live in tests/\n"));
    }

    #[tokio::test]
    async fn unwritable_location_is_an_error_result() {
        let dir = TempDir::new().unwrap();
        let memory = MemoryStore::new(&dir.path().join("missing-dir"));

        let error = run(
            &SaveMemoryArgs {
                content: "x".into(),
            },
            &memory,
        )
        .await
        .unwrap_err();
        assert!(error.to_result_text().starts_with("(error: memory file"));
    }
}
