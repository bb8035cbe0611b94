//! Tool registry.
//!
//! The registry is the single place that knows which tools an agent may use.
//! It exposes their schemas to the orchestrator, builds the system
//! instructions, and dispatches tool invocations by name. Every outcome,
//! including failures, comes back as a `ToolResult` carrying the originating
//! call id.

use crate::agent::AgentFactory;
use crate::config::{GatewayConfig, MCP_BETA_FLAG};
use crate::llm::{McpServer, SystemBlock};
use crate::memory::MemoryStore;
use crate::messages::{ToolInvocation, ToolResult};
use crate::prompt::{memory_instructions, BASE_SYSTEM_PROMPT};
use crate::tools::builtins::{
    ask_user, delegate_task, read_file, save_memory, search_files, search_in_files, write_file,
};
use crate::tools::definition::{PermissionMode, ServerTool, ToolDefinition, ToolKind, ToolRequest, ToolSpec};
use crate::tools::error::ToolError;
use crate::tools::security::Sandbox;
use std::collections::HashMap;
use std::sync::Arc;

/// Per-request usage cap of the provider's web search tool.
pub const WEB_SEARCH_MAX_USES: u32 = 3;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Characters of tool input shown in dispatch logs.
const INPUT_PREVIEW_CHARS: usize = 100;

/// Delegation wiring: who builds sub-agents and how deep this registry sits.
#[derive(Debug, Clone)]
struct Delegation {
    factory: Arc<dyn AgentFactory>,
    depth: u32,
    max_depth: u32,
}

/// The set of tools available to one agent.
///
/// # Example
///
/// ```rust,ignore
/// use coding_agent::tools::{PermissionMode, Sandbox, ToolRegistry};
///
/// let sandbox = Sandbox::new("demo/sample_repo", "demo/sample_repo/workspace")?;
/// let registry = ToolRegistry::new(sandbox, PermissionMode::ReadOnly);
/// assert!(!registry.is_enabled("write_file"));
/// ```
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    sandbox: Sandbox,
    mode: PermissionMode,
    /// Enabled local tools by wire name
    tools: HashMap<&'static str, ToolKind>,
    memory: Arc<MemoryStore>,
    gateway: Option<GatewayConfig>,
    server_tools: Vec<ServerTool>,
    delegation: Option<Delegation>,
}

impl ToolRegistry {
    /// Creates a registry over `sandbox`.
    ///
    /// The memory store defaults to `AGENTS.md` at the sandbox root. No
    /// delegation factory is attached, so `delegate_task` stays hidden.
    #[must_use]
    pub fn new(sandbox: Sandbox, mode: PermissionMode) -> Self {
        let memory = Arc::new(MemoryStore::new(sandbox.root()));
        let mut registry = Self {
            sandbox,
            mode,
            tools: HashMap::new(),
            memory,
            gateway: None,
            server_tools: vec![ServerTool::web_search(WEB_SEARCH_MAX_USES)],
            delegation: None,
        };
        registry.tools = registry.enabled_tools();
        registry
    }

    /// Shares an existing memory store, and with it the append lock.
    #[must_use]
    pub fn with_memory(mut self, memory: Arc<MemoryStore>) -> Self {
        self.memory = memory;
        self
    }

    /// Attaches an external tool gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: Option<GatewayConfig>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Replaces the provider-side tools declared with every request.
    #[must_use]
    pub fn with_server_tools(mut self, server_tools: Vec<ServerTool>) -> Self {
        self.server_tools = server_tools;
        self
    }

    /// Attaches a sub-agent factory.
    ///
    /// `delegate_task` is exposed only while `depth < max_depth`.
    #[must_use]
    pub fn with_delegation(
        mut self,
        factory: Arc<dyn AgentFactory>,
        depth: u32,
        max_depth: u32,
    ) -> Self {
        self.delegation = Some(Delegation {
            factory,
            depth,
            max_depth,
        });
        self.tools = self.enabled_tools();
        self
    }

    fn enabled_tools(&self) -> HashMap<&'static str, ToolKind> {
        ToolKind::ALL
            .into_iter()
            .filter(|kind| self.mode.allows_writes() || !kind.is_mutating())
            .filter(|kind| *kind != ToolKind::DelegateTask || self.can_delegate())
            .map(|kind| (kind.name(), kind))
            .collect()
    }

    fn can_delegate(&self) -> bool {
        self.delegation
            .as_ref()
            .is_some_and(|d| d.depth < d.max_depth)
    }

    /// Returns the sandbox.
    #[must_use]
    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Returns the permission mode.
    #[must_use]
    pub fn mode(&self) -> PermissionMode {
        self.mode
    }

    /// Returns the shared memory store.
    #[must_use]
    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.memory
    }

    /// Returns the attached gateway, if any.
    #[must_use]
    pub fn gateway(&self) -> Option<&GatewayConfig> {
        self.gateway.as_ref()
    }

    /// Returns how many delegation levels sit above this registry.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.delegation.as_ref().map_or(0, |d| d.depth)
    }

    /// Returns true if `name` is an enabled local tool.
    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Definitions of the enabled local tools, in presentation order.
    #[must_use]
    pub fn client_definitions(&self) -> Vec<ToolDefinition> {
        ToolKind::ALL
            .into_iter()
            .filter(|kind| self.tools.contains_key(kind.name()))
            .map(ToolKind::definition)
            .collect()
    }

    /// Local definitions followed by provider-side tools.
    #[must_use]
    pub fn schemas(&self) -> Vec<ToolSpec> {
        self.client_definitions()
            .into_iter()
            .map(ToolSpec::Client)
            .chain(self.server_tools.iter().cloned().map(ToolSpec::Server))
            .collect()
    }

    /// External tool servers to declare, if a gateway is attached.
    #[must_use]
    pub fn mcp_servers(&self) -> Option<Vec<McpServer>> {
        self.gateway.as_ref().map(|g| vec![g.mcp_server()])
    }

    /// Transport feature flags the current configuration needs.
    #[must_use]
    pub fn beta_flags(&self) -> Vec<String> {
        if self.gateway.is_some() {
            vec![MCP_BETA_FLAG.to_string()]
        } else {
            Vec::new()
        }
    }

    /// Builds the system instructions, reading the memory file fresh.
    pub async fn system_instructions(&self) -> Vec<SystemBlock> {
        // Not cached: notes saved by earlier runs or other sessions must show up in the next run.
        let mut blocks = vec![SystemBlock::text(BASE_SYSTEM_PROMPT)];
        match self.memory.load().await {
            Ok(Some(contents)) => blocks.push(SystemBlock::text(memory_instructions(&contents))),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "skipping unreadable memory file"),
        }
        blocks
    }

    /// Executes one invocation. Never fails: errors become result text.
    pub async fn dispatch(&self, call: &ToolInvocation) -> ToolResult {
        let preview: String = call.input.to_string().chars().take(INPUT_PREVIEW_CHARS).collect();
        let depth = self.depth();
        if depth == 0 {
            tracing::info!(tool = %call.name, id = %call.id, input = %preview, "dispatching tool");
        } else {
            tracing::debug!(tool = %call.name, id = %call.id, depth, input = %preview, "dispatching tool");
        }

        let text = match self.execute(call).await {
            Ok(text) => text,
            Err(error) => {
                tracing::debug!(tool = %call.name, depth, error = %error, "tool failed");
                error.to_result_text()
            }
        };
        ToolResult::text(call.id.clone(), text)
    }

    /// Executes all invocations of one turn concurrently.
    ///
    /// Results come back in input order, each carrying its call id.
    pub async fn dispatch_all(&self, calls: &[&ToolInvocation]) -> Vec<ToolResult> {
        futures::future::join_all(calls.iter().map(|call| self.dispatch(call))).await
    }

    async fn execute(&self, call: &ToolInvocation) -> Result<String, ToolError> {
        let kind = self.lookup(&call.name)?;
        match ToolRequest::parse(kind, &call.input)? {
            ToolRequest::AskUser(args) => Ok(ask_user::run(&args)),
            ToolRequest::SearchFiles(args) => search_files::run(args, &self.sandbox).await,
            ToolRequest::SearchInFiles(args) => search_in_files::run(args, &self.sandbox).await,
            ToolRequest::ReadFile(args) => read_file::run(&args, &self.sandbox).await,
            ToolRequest::WriteFile(args) => write_file::run(&args, &self.sandbox).await,
            ToolRequest::SaveMemory(args) => save_memory::run(&args, &self.memory).await,
            ToolRequest::DelegateTask(args) => match &self.delegation {
                Some(delegation) => {
                    delegate_task::run(&args, delegation.factory.as_ref(), delegation.depth).await
                }
                None => Err(ToolError::delegation("delegation is not configured")),
            },
        }
    }

    /// Resolves a wire name to an enabled kind.
    fn lookup(&self, name: &str) -> Result<ToolKind, ToolError> {
        if let Some(kind) = self.tools.get(name) {
            return Ok(*kind);
        }
        match ToolKind::from_name(name) {
            Some(kind) if kind.is_mutating() && !self.mode.allows_writes() => {
                Err(ToolError::disabled(name))
            }
            _ => Err(ToolError::unknown_tool(name, self.suggest(name))),
        }
    }

    fn suggest(&self, name: &str) -> Option<String> {
        self.tools
            .keys()
            .map(|known| (strsim::jaro_winkler(name, known), *known))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, known)| known.to_string())
    }
}
