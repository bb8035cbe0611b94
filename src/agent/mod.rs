//! The agent: an orchestration loop and the sub-agents it may delegate to.

mod config;
mod delegation;
mod orchestrator;

pub use config::{OrchestratorConfig, DEFAULT_MAX_TURNS};
pub use delegation::{AgentFactory, AgentSession, SubAgentFactory};
pub use orchestrator::{Orchestrator, INTERRUPTED_RESULT, NO_RESPONSE};
