//! Sub-agent construction for `delegate_task`.
//!
//! A sub-agent is a fresh [`Orchestrator`] paired with a read-only
//! [`ToolRegistry`] over the parent's sandbox. It shares the completion
//! client, the memory file, and the gateway, but never the parent's history.

use crate::agent::config::OrchestratorConfig;
use crate::agent::orchestrator::Orchestrator;
use crate::config::GatewayConfig;
use crate::error::AgentError;
use crate::llm::{CompletionClient, LLMError};
use crate::memory::MemoryStore;
use crate::tools::{PermissionMode, Sandbox, ToolRegistry};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// Builds sub-agents on demand.
pub trait AgentFactory: Send + Sync + fmt::Debug {
    /// Creates a read-only agent at delegation level `depth`.
    ///
    /// # Errors
    ///
    /// Returns an error if the sub-agent's sandbox cannot be established.
    fn spawn_read_only(&self, depth: u32) -> Result<AgentSession, AgentError>;
}

/// An orchestrator with the registry it runs against.
#[derive(Debug)]
pub struct AgentSession {
    /// The sub-agent's loop and history
    pub orchestrator: Orchestrator,
    /// The sub-agent's tools
    pub registry: ToolRegistry,
}

impl AgentSession {
    /// Runs `prompt` to completion and returns only the final answer.
    ///
    /// The future is boxed because a sub-agent may itself delegate.
    pub fn into_answer(self, prompt: String) -> BoxFuture<'static, Result<String, LLMError>> {
        let AgentSession {
            mut orchestrator,
            registry,
        } = self;
        Box::pin(async move {
            let answer = orchestrator.run(&prompt, &registry).await;
            tracing::debug!(
                sub_agent = %orchestrator.session_id(),
                turns = orchestrator.history().len(),
                "sub-agent finished"
            );
            answer
        })
    }
}

/// The default factory: sub-agents share the parent's client and sandbox.
#[derive(Debug, Clone)]
pub struct SubAgentFactory {
    client: Arc<dyn CompletionClient>,
    config: OrchestratorConfig,
    sandbox: Sandbox,
    memory: Arc<MemoryStore>,
    gateway: Option<GatewayConfig>,
    max_depth: u32,
}

impl SubAgentFactory {
    /// Creates a factory for sub-agents of a parent running over `sandbox`.
    #[must_use]
    pub fn new(
        client: Arc<dyn CompletionClient>,
        config: OrchestratorConfig,
        sandbox: Sandbox,
        memory: Arc<MemoryStore>,
    ) -> Self {
        Self {
            client,
            config,
            sandbox,
            memory,
            gateway: None,
            max_depth: crate::config::DEFAULT_MAX_DELEGATION_DEPTH,
        }
    }

    /// Sets the gateway sub-agents may use.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Option<GatewayConfig>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Sets how many levels below the top-level agent may exist.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the depth limit.
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }
}

impl AgentFactory for SubAgentFactory {
    fn spawn_read_only(&self, depth: u32) -> Result<AgentSession, AgentError> {
        // The root is re-canonicalized in case the tree moved since startup.
        let sandbox = Sandbox::new(self.sandbox.root(), self.sandbox.write_root())
            .map_err(|e| AgentError::workspace(self.sandbox.root(), e.to_string()))?;

        let registry = ToolRegistry::new(sandbox, PermissionMode::ReadOnly)
            .with_memory(Arc::clone(&self.memory))
            .with_gateway(self.gateway.clone())
            .with_delegation(Arc::new(self.clone()), depth, self.max_depth);
        let orchestrator =
            Orchestrator::new(Arc::clone(&self.client), self.config.clone()).with_depth(depth);

        tracing::debug!(
            sub_agent = %orchestrator.session_id(),
            depth,
            max_depth = self.max_depth,
            "spawned read-only sub-agent"
        );
        Ok(AgentSession {
            orchestrator,
            registry,
        })
    }
}
