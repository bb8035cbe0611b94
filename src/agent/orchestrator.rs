//! The orchestration loop.
//!
//! One `run` takes a user message through any number of tool rounds to a
//! final answer:
//!
//! ```text
//! user text -> history
//!   loop (at most max_turns):
//!     request(history, tools, system) -> response
//!     response -> history
//!     no tool_use blocks? -> return text
//!     dispatch all tool_use blocks concurrently
//!     results (one user turn) -> history
//!   cap reached -> last assistant text or "(no response)"
//! ```

use crate::agent::config::OrchestratorConfig;
use crate::llm::{CompletionClient, CompletionRequest, LLMError, ToolChoice};
use crate::messages::{ContentBlock, Message, MessageContent, Role, ToolInvocation, ToolResult};
use crate::tools::ToolRegistry;
use crate::types::SessionId;
use std::collections::HashMap;
use std::sync::Arc;

/// Returned when the turn cap is hit before any assistant text was produced.
pub const NO_RESPONSE: &str = "(no response)";

/// Result text given to tool calls whose dispatch never completed.
pub const INTERRUPTED_RESULT: &str = "(interrupted: tool call was abandoned before completing)";

/// Logs at `info` for the top-level agent and at `debug` for sub-agents.
macro_rules! progress {
    ($self:expr, $($arg:tt)+) => {
        if $self.depth == 0 {
            tracing::info!(session = %$self.session_id, $($arg)+);
        } else {
            tracing::debug!(session = %$self.session_id, depth = $self.depth, $($arg)+);
        }
    };
}

/// A single agent: a completion client plus the conversation history it owns.
#[derive(Debug)]
pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
    model: String,
    max_tokens: u32,
    max_turns: u32,
    depth: u32,
    session_id: SessionId,
    history: Vec<Message>,
}

impl Orchestrator {
    /// Creates an orchestrator with an empty history.
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, config: OrchestratorConfig) -> Self {
        let model = config
            .model
            .unwrap_or_else(|| client.model().to_string());
        Self {
            client,
            model,
            max_tokens: config.max_tokens,
            max_turns: config.max_turns.max(1),
            depth: 0,
            session_id: SessionId::new(),
            history: Vec::new(),
        }
    }

    /// Marks this orchestrator as a sub-agent `depth` levels down.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Returns the session identifier used in logs.
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the model identifier sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Returns the turn cap.
    #[must_use]
    pub fn max_turns(&self) -> u32 {
        self.max_turns
    }

    /// Returns the conversation history.
    #[must_use]
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Drops all history.
    pub fn clear_history(&mut self) {
        self.history.clear();
        progress!(self, "history cleared");
    }

    /// Runs one exchange and returns the final answer.
    ///
    /// If a previous `run` was dropped while tools were executing, the
    /// dangling calls are answered with [`INTERRUPTED_RESULT`] in the same
    /// user turn as `user_text`.
    ///
    /// # Errors
    ///
    /// Returns `LLMError` if a completion request fails. History keeps
    /// everything appended before the failure.
    pub async fn run(&mut self, user_text: &str, registry: &ToolRegistry) -> Result<String, LLMError> {
        self.push_user_turn(user_text);

        let system = registry.system_instructions().await;
        let tools = registry.schemas();
        let mcp_servers = registry.mcp_servers();
        let betas = registry.beta_flags();
        let mut last_text = String::new();

        for turn in 1..=self.max_turns {
            progress!(self, turn, "sending request (turn {turn})");
            let request = CompletionRequest {
                model: self.model.clone(),
                max_tokens: self.max_tokens,
                system: system.clone(),
                messages: self.history.clone(),
                tools: tools.clone(),
                tool_choice: ToolChoice::default(),
                mcp_servers: mcp_servers.clone(),
                betas: betas.clone(),
            };
            let response = self.client.complete(&request).await?;
            tracing::debug!(
                session = %self.session_id,
                stop_reason = ?response.stop_reason,
                input_tokens = response.usage.input_tokens,
                output_tokens = response.usage.output_tokens,
                "response received"
            );

            let assistant = Message::assistant(response.content);
            let text = assistant.text();
            let calls: Vec<ToolInvocation> =
                assistant.tool_invocations().into_iter().cloned().collect();
            self.history.push(assistant);

            if calls.is_empty() {
                return Ok(text);
            }
            if !text.is_empty() {
                last_text = text;
            }

            progress!(self, count = calls.len(), "executing {} tool(s)", calls.len());
            let refs: Vec<&ToolInvocation> = calls.iter().collect();
            let results = registry.dispatch_all(&refs).await;
            self.history
                .push(Message::tool_results(assemble_batch(&calls, results)));
        }

        if self.depth == 0 {
            tracing::warn!(session = %self.session_id, max_turns = self.max_turns, "reached maximum turns");
        } else {
            tracing::debug!(session = %self.session_id, max_turns = self.max_turns, "reached maximum turns");
        }
        Ok(if last_text.is_empty() {
            NO_RESPONSE.to_string()
        } else {
            last_text
        })
    }

    /// Appends the user turn, repairing history left by an abandoned run.
    fn push_user_turn(&mut self, user_text: &str) {
        let dangling: Vec<String> = match self.history.last() {
            Some(last) if last.role == Role::Assistant => last
                .tool_invocations()
                .into_iter()
                .map(|call| call.id.clone())
                .collect(),
            _ => Vec::new(),
        };

        if !dangling.is_empty() {
            tracing::warn!(
                session = %self.session_id,
                count = dangling.len(),
                "answering tool calls abandoned by an interrupted run"
            );
            let mut blocks: Vec<ContentBlock> = dangling
                .into_iter()
                .map(|id| ContentBlock::ToolResult(ToolResult::text(id, INTERRUPTED_RESULT)))
                .collect();
            blocks.push(ContentBlock::text(user_text));
            self.history.push(Message {
                role: Role::User,
                content: MessageContent::Blocks(blocks),
            });
            return;
        }

        // A run abandoned while awaiting the provider leaves a user turn last.
        if let Some(last) = self.history.last_mut().filter(|m| m.role == Role::User) {
            let mut blocks = match std::mem::replace(&mut last.content, MessageContent::Blocks(Vec::new())) {
                MessageContent::Text(text) => vec![ContentBlock::text(text)],
                MessageContent::Blocks(blocks) => blocks,
            };
            blocks.push(ContentBlock::text(user_text));
            last.content = MessageContent::Blocks(blocks);
            return;
        }

        self.history.push(Message::user(user_text));
    }
}

/// Orders results to match `calls`, pairing them by call id.
fn assemble_batch(calls: &[ToolInvocation], results: Vec<ToolResult>) -> Vec<ToolResult> {
    let mut by_id: HashMap<String, ToolResult> = results
        .into_iter()
        .map(|result| (result.tool_use_id.clone(), result))
        .collect();
    calls
        .iter()
        .map(|call| {
            by_id
                .remove(&call.id)
                .unwrap_or_else(|| ToolResult::text(call.id.clone(), INTERRUPTED_RESULT))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str) -> ToolInvocation {
        ToolInvocation {
            id: id.to_string(),
            name: "read_file".to_string(),
            input: json!({"path": "a"}),
        }
    }

    #[test]
    fn batch_is_matched_by_id() {
        let calls = vec![call("a"), call("b"), call("c")];
        let results = vec![
            ToolResult::text("c", "third"),
            ToolResult::text("a", "first"),
            ToolResult::text("b", "second"),
        ];

        let batch = assemble_batch(&calls, results);

        let pairs: Vec<_> = batch
            .iter()
            .map(|r| (r.tool_use_id.as_str(), r.text_content()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("a", "first".to_string()),
                ("b", "second".to_string()),
                ("c", "third".to_string())
            ]
        );
    }

    #[test]
    fn missing_result_is_marked_interrupted() {
        let batch = assemble_batch(&[call("a")], Vec::new());
        assert_eq!(batch[0].text_content(), INTERRUPTED_RESULT);
    }
}
