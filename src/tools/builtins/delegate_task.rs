//! Delegate a sub-task to a read-only sub-agent.
//!
//! The sub-agent gets a fresh history and a read-only registry over the same
//! sandbox. Only its final answer comes back.

use crate::agent::AgentFactory;
use crate::tools::{ToolDefinition, ToolError};
use serde::Deserialize;
use serde_json::json;

/// Prefix of a successful delegated answer.
pub const COMPLETED_MARKER: &str = "[Sub-agent completed task]";

/// Arguments for `delegate_task`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DelegateTaskArgs {
    /// What the sub-agent should do
    pub task: String,
    /// Background the sub-agent needs
    #[serde(default)]
    pub context: Option<String>,
}

impl DelegateTaskArgs {
    /// Builds the sub-agent's opening message.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self.context.as_deref() {
            Some(context) if !context.is_empty() => format!("{context}\n\n{}", self.task),
            _ => self.task.clone(),
        }
    }
}

/// Returns the tool definition.
#[must_use]
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "delegate_task".to_string(),
        description: "Delegate a specific task to a sub-agent with read-only access. Use this \
                      when you need to:\n\
                      - Perform independent analysis or research in parallel\n\
                      - Break down complex tasks into smaller subtasks\n\
                      - Isolate exploratory work from main execution\n\
                      The sub-agent has access to all read tools (search, read_file, ask_user) \
                      but cannot modify files. Returns only the final text response."
            .to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "task": {
                    "type": "string",
                    "description": "Clear, specific task description for the sub-agent. Be explicit about what information or analysis you need back."
                },
                "context": {
                    "type": "string",
                    "description": "Optional context or constraints for the sub-agent. Include relevant background information that isn't in the task description."
                }
            },
            "required": ["task"]
        }),
    }
}

/// Runs the task on a sub-agent one level below `depth`.
///
/// # Errors
///
/// Returns a `Delegation` error if the sub-agent cannot be built or its
/// completion requests fail.
pub async fn run(
    args: &DelegateTaskArgs,
    factory: &dyn AgentFactory,
    depth: u32,
) -> Result<String, ToolError> {
    let session = factory
        .spawn_read_only(depth + 1)
        .map_err(|e| ToolError::delegation(e.to_string()))?;
    tracing::info!(
        sub_agent = %session.orchestrator.session_id(),
        depth = depth + 1,
        "delegating task"
    );

    let answer = session
        .into_answer(args.prompt())
        .await
        .map_err(|e| ToolError::delegation(e.to_string()))?;
    Ok(format!("{COMPLETED_MARKER}\n\n{answer}"))
}
