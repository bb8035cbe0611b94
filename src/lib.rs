//! # coding-agent
//!
//! A repository-aware coding agent: a bounded tool-use loop around the
//! Anthropic Messages API, with sandboxed file tools, read-only sub-agent
//! delegation, and a persistent `AGENTS.md` memory file.
//!
//! ## Architecture
//!
//! - **Orchestrator** (`agent`): owns the conversation history and drives
//!   request, dispatch, result rounds up to a turn cap
//! - **Completion client** (`llm`): the provider boundary, behind the
//!   `CompletionClient` trait
//! - **Tool registry** (`tools`): permission filtering, schemas, and
//!   concurrent dispatch of tool calls
//! - **Sandbox** (`tools::security`): read and write containment
//! - **Memory** (`memory`): append-only notes read back into every new
//!   session's instructions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coding_agent::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(AnthropicClient::new(ProviderConfig::anthropic("sk-ant-..."))?);
//!     let sandbox = Sandbox::new("demo/sample_repo", "workspace")?;
//!     let registry = ToolRegistry::new(sandbox, PermissionMode::ReadOnly);
//!     let mut agent = Orchestrator::new(client, OrchestratorConfig::default());
//!
//!     let answer = agent.run("Where is login handled?", &registry).await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod messages;
pub mod prompt;
pub mod tools;
pub mod types;
pub mod workspace;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agent::{
        AgentFactory, AgentSession, Orchestrator, OrchestratorConfig, SubAgentFactory,
    };
    pub use crate::config::{load_settings, GatewayConfig, Settings};
    pub use crate::error::{AgentError, AgentErrorKind};
    pub use crate::llm::{
        AnthropicClient, CompletionClient, CompletionRequest, CompletionResponse, LLMError,
        ProviderConfig,
    };
    pub use crate::memory::MemoryStore;
    pub use crate::messages::*;
    pub use crate::tools::{PermissionMode, Sandbox, ToolError, ToolRegistry};
    pub use crate::types::SessionId;
}
