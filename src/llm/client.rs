//! Completion client trait and request/response types.
//!
//! The `CompletionClient` trait abstracts the completion service so the
//! orchestrator can be driven by the real Anthropic client or by a scripted
//! stub in tests.

use crate::llm::error::LLMError;
use crate::messages::{ContentBlock, Message};
use crate::tools::ToolSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One system instruction block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemBlock {
    /// Always `text`
    #[serde(rename = "type")]
    pub block_type: String,
    /// Instruction text
    pub text: String,
}

impl SystemBlock {
    /// Creates a text instruction block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            block_type: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Tool-choice policy sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChoice {
    /// Always `auto`
    #[serde(rename = "type")]
    pub choice_type: AutoChoice,
    /// Whether the model must emit at most one tool call per response
    pub disable_parallel_tool_use: bool,
}

/// The `auto` tool-choice marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoChoice {
    /// Model decides whether to call tools
    #[default]
    Auto,
}

impl Default for ToolChoice {
    fn default() -> Self {
        Self {
            choice_type: AutoChoice::Auto,
            disable_parallel_tool_use: false,
        }
    }
}

/// An external tool server reachable by URL (MCP connector).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServer {
    /// Always `url`
    #[serde(rename = "type")]
    pub server_type: String,
    /// Server endpoint
    pub url: String,
    /// Name the model sees
    pub name: String,
    /// Bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_token: Option<String>,
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// Output token cap
    pub max_tokens: u32,
    /// System instruction blocks
    pub system: Vec<SystemBlock>,
    /// Full conversation history
    pub messages: Vec<Message>,
    /// Client definitions followed by server tools
    pub tools: Vec<ToolSpec>,
    /// Parallel-friendly tool choice
    pub tool_choice: ToolChoice,
    /// External tool servers, when configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_servers: Option<Vec<McpServer>>,
    /// Opt-in transport feature flags; sent as a header, not in the body
    #[serde(skip)]
    pub betas: Vec<String>,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Prompt tokens
    #[serde(default)]
    pub input_tokens: u64,
    /// Generated tokens
    #[serde(default)]
    pub output_tokens: u64,
}

/// The provider's reply to one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Provider message id
    #[serde(default)]
    pub id: String,
    /// Model that answered
    #[serde(default)]
    pub model: String,
    /// Why generation stopped
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Ordered content blocks
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    /// Token usage
    #[serde(default)]
    pub usage: Usage,
}

impl CompletionResponse {
    /// Creates a response holding only `content`.
    #[must_use]
    pub fn new(content: Vec<ContentBlock>) -> Self {
        Self {
            id: String::new(),
            model: String::new(),
            stop_reason: None,
            content,
            usage: Usage::default(),
        }
    }
}

/// Trait for completion-service clients.
///
/// # Example
///
/// ```ignore
/// use coding_agent::llm::{AnthropicClient, CompletionClient, ProviderConfig};
///
/// let client = AnthropicClient::new(ProviderConfig::anthropic(api_key))?;
/// let response = client.complete(&request).await?;
/// ```
#[async_trait]
pub trait CompletionClient: Send + Sync + std::fmt::Debug {
    /// Sends one request and waits for the full response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LLMError>;

    /// Returns the default model identifier.
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ServerTool, ToolKind};
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "claude-sonnet-4-5".into(),
            max_tokens: 4096,
            system: vec![SystemBlock::text("Be brief.")],
            messages: vec![Message::user("hi")],
            tools: vec![
                ToolSpec::Client(ToolKind::AskUser.definition()),
                ToolSpec::Server(ServerTool::web_search(3)),
            ],
            tool_choice: ToolChoice::default(),
            mcp_servers: None,
            betas: vec!["mcp-client-2025-04-04".into()],
        }
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(request()).unwrap();
        assert_eq!(body["tool_choice"], json!({"type": "auto", "disable_parallel_tool_use": false}));
        assert_eq!(body["system"], json!([{"type": "text", "text": "Be brief."}]));
        assert_eq!(body["tools"][0]["name"], "ask_user");
        assert_eq!(body["tools"][1]["type"], "web_search_20250305");
        assert!(body.get("betas").is_none());
        assert!(body.get("mcp_servers").is_none());
    }

    #[test]
    fn mcp_server_omits_missing_token() {
        let server = McpServer {
            server_type: "url".into(),
            url: "https://mcp.example.com/sse".into(),
            name: "example-mcp".into(),
            authorization_token: None,
        };
        assert_eq!(
            serde_json::to_value(server).unwrap(),
            json!({"type": "url", "url": "https://mcp.example.com/sse", "name": "example-mcp"})
        );
    }

    #[test]
    fn response_parses_with_provider_blocks() {
        let response: CompletionResponse = serde_json::from_value(json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "model": "claude-sonnet-4-5",
            "stop_reason": "tool_use",
            "content": [
                {"type": "text", "text": "Looking."},
                {"type": "server_tool_use", "id": "srv_1", "name": "web_search", "input": {"query": "rust"}},
                {"type": "tool_use", "id": "toolu_1", "name": "read_file", "input": {"path": "a.py"}}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }))
        .unwrap();

        assert_eq!(response.content.len(), 3);
        assert!(matches!(response.content[1], ContentBlock::Provider(_)));
        assert_eq!(response.usage.output_tokens, 5);
    }
}
