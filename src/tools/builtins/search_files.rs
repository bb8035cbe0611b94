//! File name search by glob pattern.

use crate::tools::builtins::{glob_under, run_blocking, NO_MATCHES};
use crate::tools::security::Sandbox;
use crate::tools::{ToolDefinition, ToolError, ToolKind};
use serde::Deserialize;
use serde_json::json;

/// Results returned when no limit is given.
pub const DEFAULT_LIMIT: usize = 100;

/// Upper bound on any requested limit.
pub const MAX_LIMIT: usize = 200;

/// Arguments for `search_files`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchFilesArgs {
    /// Glob pattern relative to the repository root
    pub pattern: String,
    /// Maximum number of paths to list
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
        name: "search_files".to_string(),
        description: "List files by glob-style pattern relative to the repository root. \
                      Use to discover modules by name. Returns up to 200 matches."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "pattern": {
                    "type": "string",
                    "description": "Glob pattern like 'src/**/auth*.ts' or '**/*.py'"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "minimum": 1,
                    "maximum": MAX_LIMIT
                }
            },
            "required": ["pattern"]
        }),
    }
}

/// Lists matching paths, sorted and relative to the root.
///
/// # Errors
///
/// Returns `ToolError` for patterns that escape the root or fail to parse.
pub async fn run(args: SearchFilesArgs, sandbox: &Sandbox) -> Result<String, ToolError> {
    let sandbox = sandbox.clone();
    run_blocking(move || search(&args, &sandbox)).await
}

fn search(args: &SearchFilesArgs, sandbox: &Sandbox) -> Result<String, ToolError> {
    let limit = args.limit.clamp(1, MAX_LIMIT);
    let matches = glob_under(sandbox, &args.pattern, ToolKind::SearchFiles)?;
    if matches.is_empty() {
        return Ok(NO_MATCHES.to_string());
    }

    let mut text = matches
        .iter()
        .take(limit)
        .map(|path| sandbox.relative_display(path))
        .collect::<Vec<_>>()
        .join("\n");
    if matches.len() > limit {
        text.push_str(&format!(
            "\n\n(showing {limit} of {} matches)",
            matches.len()
        ));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Sandbox) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/auth")).unwrap();
        fs::write(dir.path().join("src/auth/login.py"), "def login(): pass").unwrap();
        fs::write(dir.path().join("src/auth/register.py"), "def register(): pass").unwrap();
        fs::write(dir.path().join("setup.py"), "").unwrap();
        fs::write(dir.path().join("README.md"), "# demo").unwrap();
        let sandbox = Sandbox::new(dir.path(), "workspace").unwrap();
        (dir, sandbox)
    }

    fn args(pattern: &str, limit: usize) -> SearchFilesArgs {
        SearchFilesArgs {
            pattern: pattern.to_string(),
            limit,
        }
    }

    #[tokio::test]
    async fn lists_sorted_relative_paths() {
        let (_dir, sandbox) = fixture();
        let text = run(args("**/*.py", 100), &sandbox).await.unwrap();
        assert_eq!(text, "setup.py\nsrc/auth/login.py\nsrc/auth/register.py");
    }

    #[tokio::test]
    async fn top_level_pattern_does_not_recurse() {
        let (_dir, sandbox) = fixture();
        let text = run(args("*.py", 100), &sandbox).await.unwrap();
        assert_eq!(text, "setup.py");
    }

    #[tokio::test]
    async fn zero_matches_reports_literal_marker() {
        let (_dir, sandbox) = fixture();
        let text = run(args("**/*.rs", 100), &sandbox).await.unwrap();
        assert_eq!(text, "(no matches found)");
    }

    #[tokio::test]
    async fn truncation_reports_totals() {
        let (_dir, sandbox) = fixture();
        let text = run(args("**/*.py", 2), &sandbox).await.unwrap();
        assert_eq!(
            text,
            "setup.py\nsrc/auth/login.py\n\n(showing 2 of 3 matches)"
        );
    }

    #[tokio::test]
    async fn traversal_patterns_are_rejected() {
        let (_dir, sandbox) = fixture();
        let error = run(args("../*", 10), &sandbox).await.unwrap_err();
        assert!(error.is_sandbox_violation());
    }

    #[tokio::test]
    async fn hidden_files_need_a_literal_dot() {
        let (dir, sandbox) = fixture();
        fs::write(dir.path().join(".secret.py"), "").unwrap();

        let text = run(args("*.py", 10), &sandbox).await.unwrap();
        assert_eq!(text, "setup.py");
        let text = run(args(".*.py", 10), &sandbox).await.unwrap();
        assert_eq!(text, ".secret.py");
    }

    #[test]
    fn limit_defaults_when_omitted() {
        let parsed: SearchFilesArgs =
            serde_json::from_value(serde_json::json!({"pattern": "*"})).unwrap();
        assert_eq!(parsed.limit, DEFAULT_LIMIT);
    }
}
