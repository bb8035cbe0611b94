//! Conversation history types.
//!
//! These mirror the Messages API wire format so history can be sent back to
//! the provider unchanged.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Operator input and tool results
    User,
    /// Model output
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced this turn
    pub role: Role,
    /// Plain text or structured blocks
    pub content: MessageContent,
}

/// Turn payload: either a bare string or a list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// Structured blocks
    Blocks(Vec<ContentBlock>),
}

/// A model request to run a locally executed tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Opaque call id chosen by the provider
    pub id: String,
    /// Tool name
    pub name: String,
    /// Tool input as issued by the model
    pub input: Value,
}

/// The answer to one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Call id of the invocation this answers
    pub tool_use_id: String,
    /// Result content; always text today
    pub content: Vec<ToolResultContent>,
}

/// Content carried inside a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolResultContent {
    /// Text content
    Text {
        /// The text
        text: String,
    },
}

impl ToolResult {
    /// Creates a single-text-block result for `tool_use_id`.
    #[must_use]
    pub fn text(tool_use_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            content: vec![ToolResultContent::Text { text: text.into() }],
        }
    }

    /// Concatenates all text content.
    #[must_use]
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                ToolResultContent::Text { text } => text.as_str(),
            })
            .collect()
    }
}

/// A block inside a structured turn.
///
/// Blocks the agent does not act on (server tool traffic, MCP calls,
/// thinking) are kept verbatim as `Provider` so the assistant turn can be
/// replayed exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    /// Natural-language text
    Text {
        /// The text
        text: String,
    },
    /// A request to run a local tool
    ToolUse(ToolInvocation),
    /// The answer to a local tool request
    ToolResult(ToolResult),
    /// Any other provider block, untouched
    Provider(Value),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TypedBlock {
    Text { text: String },
    ToolUse(ToolInvocation),
    ToolResult(ToolResult),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TypedBlockRef<'a> {
    Text { text: &'a str },
    ToolUse(&'a ToolInvocation),
    ToolResult(&'a ToolResult),
}

impl Serialize for ContentBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text { text } => TypedBlockRef::Text { text }.serialize(serializer),
            Self::ToolUse(invocation) => TypedBlockRef::ToolUse(invocation).serialize(serializer),
            Self::ToolResult(result) => TypedBlockRef::ToolResult(result).serialize(serializer),
            Self::Provider(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ContentBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value.get("type").and_then(Value::as_str) {
            Some("text" | "tool_use" | "tool_result") => {
                let typed: TypedBlock = serde_json::from_value(value).map_err(de::Error::custom)?;
                Ok(match typed {
                    TypedBlock::Text { text } => Self::Text { text },
                    TypedBlock::ToolUse(invocation) => Self::ToolUse(invocation),
                    TypedBlock::ToolResult(result) => Self::ToolResult(result),
                })
            }
            _ => Ok(Self::Provider(value)),
        }
    }
}

impl ContentBlock {
    /// Creates a text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

impl Message {
    /// Creates a plain-text user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Creates an assistant turn from response blocks.
    #[must_use]
    pub fn assistant(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Creates a user turn carrying a batch of tool results.
    #[must_use]
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(
                results.into_iter().map(ContentBlock::ToolResult).collect(),
            ),
        }
    }

    /// Returns the blocks of this turn; plain text has none.
    #[must_use]
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Text(_) => &[],
            MessageContent::Blocks(blocks) => blocks,
        }
    }

    /// Concatenates the text of this turn.
    #[must_use]
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }

    /// Returns the local tool invocations requested in this turn.
    #[must_use]
    pub fn tool_invocations(&self) -> Vec<&ToolInvocation> {
        self.blocks()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(invocation) => Some(invocation),
                _ => None,
            })
            .collect()
    }

    /// Returns the tool results carried in this turn.
    #[must_use]
    pub fn tool_results_in(&self) -> Vec<&ToolResult> {
        self.blocks()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolResult(result) => Some(result),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_text_serializes_as_plain_string() {
        let value = serde_json::to_value(Message::user("hello")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hello"}));
    }

    #[test]
    fn tool_result_turn_matches_wire_format() {
        let message = Message::tool_results(vec![ToolResult::text("toolu_1", "ok")]);
        let value = serde_json::to_value(message).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "user",
                "content": [{
                    "type": "tool_result",
                    "tool_use_id": "toolu_1",
                    "content": [{"type": "text", "text": "ok"}]
                }]
            })
        );
    }

    #[test]
    fn provider_blocks_survive_a_round_trip() {
        let raw = json!([
            {"type": "text", "text": "Let me check."},
            {"type": "server_tool_use", "id": "srvtoolu_1", "name": "web_search", "input": {"query": "rust"}},
            {"type": "tool_use", "id": "toolu_9", "name": "read_file", "input": {"path": "a.py"}}
        ]);
        let blocks: Vec<ContentBlock> = serde_json::from_value(raw.clone()).unwrap();

        assert!(matches!(blocks[1], ContentBlock::Provider(_)));
        assert_eq!(serde_json::to_value(&blocks).unwrap(), raw);
    }

    #[test]
    fn assistant_helpers_pick_out_text_and_invocations() {
        let message = Message::assistant(vec![
            ContentBlock::text("Searching "),
            ContentBlock::ToolUse(ToolInvocation {
                id: "toolu_1".into(),
                name: "search_files".into(),
                input: json!({"pattern": "*.py"}),
            }),
            ContentBlock::text("now."),
        ]);

        assert_eq!(message.text(), "Searching now.");
        let invocations = message.tool_invocations();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].name, "search_files");
    }

    #[test]
    fn malformed_known_block_is_an_error() {
        let result: Result<ContentBlock, _> =
            serde_json::from_value(json!({"type": "tool_use", "id": "x"}));
        assert!(result.is_err());
    }
}
