//! Clarifying-question tool.
//!
//! The question is handed back to the model with a marker; the model then
//! relays it to the operator in its answer.

use crate::tools::ToolDefinition;
use serde::Deserialize;
use serde_json::json;

/// Marker prefixed to every relayed question.
pub const QUESTION_MARKER: &str = "[QUESTION_TO_USER]";

/// Arguments for `ask_user`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AskUserArgs {
    /// One concise question
    #[serde(default)]
    pub question: String,
}

/// Returns the tool definition.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "ask_user".to_string(),
        description: "Ask the end-user a clarifying question when requirements are missing or \
                      ambiguous. Use sparingly and ask one or two crisp questions at a time."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "question": {
                    "type": "string",
                    "description": "One concise question to the user"
                }
            },
            "required": ["question"]
        }),
    }
}

/// Formats the question for the model.
#[must_use]
pub fn run(args: &AskUserArgs) -> String {
    format!("{QUESTION_MARKER} {}", args.question)
}
