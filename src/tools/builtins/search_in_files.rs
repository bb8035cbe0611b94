//! Plain-substring content search across text files.

use crate::tools::builtins::{glob_under, run_blocking, NO_MATCHES};
use crate::tools::security::{is_eligible_text_file, Sandbox, DEFAULT_MAX_TEXT_FILE_BYTES};
use crate::tools::{ToolDefinition, ToolError, ToolKind};
use serde::Deserialize;
use serde_json::json;

/// Matching lines returned when no limit is given.
pub const DEFAULT_LIMIT: usize = 80;

/// Upper bound on any requested limit.
pub const MAX_LIMIT: usize = 200;

/// Scope searched when no paths are given.
pub const DEFAULT_PATTERN: &str = "**/*";

/// Arguments for `search_in_files`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchInFilesArgs {
    /// Text to look for
    pub keyword: String,
    /// Glob patterns narrowing the search
    #[serde(default)]
    pub paths: Option<Vec<String>>,
    /// Maximum number of matching lines
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Returns the tool definition.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "search_in_files".to_string(),
        description: "Grep-like textual search across files. Use to locate definitions, API \
                      usage, or TODOs. Avoid huge binary files. Provide small 'paths' to narrow \
                      scope when possible."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "keyword": {
                    "type": "string",
                    "description": "The text to search for"
                },
                "paths": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "List of glob patterns to search within (e.g., ['src/**/*.py'])"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of matches to return",
                    "minimum": 1,
                    "maximum": MAX_LIMIT
                }
            },
            "required": ["keyword"]
        }),
    }
}

/// Emits `path:line:text` for every matching line, up to the limit.
///
/// # Errors
///
/// Returns `ToolError` for patterns that escape the root or fail to parse.
pub async fn run(args: SearchInFilesArgs, sandbox: &Sandbox) -> Result<String, ToolError> {
    let sandbox = sandbox.clone();
    run_blocking(move || search(&args, &sandbox)).await
}

fn search(args: &SearchInFilesArgs, sandbox: &Sandbox) -> Result<String, ToolError> {
    let limit = args.limit.clamp(1, MAX_LIMIT);
    let patterns = match &args.paths {
        Some(paths) if !paths.is_empty() => paths.clone(),
        _ => vec![DEFAULT_PATTERN.to_string()],
    };

    let mut lines = Vec::new();
    'patterns: for pattern in &patterns {
        for path in glob_under(sandbox, pattern, ToolKind::SearchInFiles)? {
            if !is_eligible_text_file(&path, DEFAULT_MAX_TEXT_FILE_BYTES) {
                continue;
            }
            let bytes = match std::fs::read(&path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let content = String::from_utf8_lossy(&bytes);
            let relative = sandbox.relative_display(&path);
            for (index, line) in content.lines().enumerate() {
                if line.contains(&args.keyword) {
                    lines.push(format!("{relative}:{}:{}", index + 1, line.trim_end()));
                    if lines.len() >= limit {
                        break 'patterns;
                    }
                }
            }
        }
    }

    if lines.is_empty() {
        return Ok(NO_MATCHES.to_string());
    }
    let mut text = lines.join("\n");
    if lines.len() >= limit {
        text.push_str(&format!("\n\n(limited to {limit} matches)"));
    }
    Ok(text)
}
