//! Configuration types.
//!
//! `FileConfig` mirrors the TOML file, where every key is optional.
//! `Settings` is the fully resolved configuration the binary runs with.

use crate::agent::{OrchestratorConfig, DEFAULT_MAX_TURNS};
use crate::error::AgentError;
use crate::llm::{McpServer, ProviderConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Default number of delegation levels below the top-level agent.
pub const DEFAULT_MAX_DELEGATION_DEPTH: u32 = 1;

/// Default write root, relative to the sandbox root.
pub const DEFAULT_WRITE_ROOT: &str = "workspace";

/// Name the model sees for the configured tool gateway.
pub const GATEWAY_NAME: &str = "example-mcp";

/// Feature flag required when a tool gateway is attached.
pub const MCP_BETA_FLAG: &str = "mcp-client-2025-04-04";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Contents of a configuration file.
///
/// ```toml
/// model = "claude-sonnet-4-5"
/// max_turns = 12
/// write_root = "scratch"
///
/// [gateway]
/// url = "https://mcp.example.com/sse"
///
/// [logging]
/// file = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Model identifier
    pub model: Option<String>,
    /// Output token cap per response
    pub max_tokens: Option<u32>,
    /// Completion requests per run
    pub max_turns: Option<u32>,
    /// Delegation levels below the top-level agent
    pub max_delegation_depth: Option<u32>,
    /// API base URL
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Write root; relative paths resolve against the working directory
    pub write_root: Option<PathBuf>,
    /// External tool gateway
    pub gateway: Option<GatewayFileConfig>,
    /// Logging options
    pub logging: Option<LoggingConfig>,
}

impl FileConfig {
    /// Returns true if no key was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The `[gateway]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayFileConfig {
    /// Server URL
    pub url: Option<String>,
    /// Bearer token
    pub token: Option<String>,
}

/// A validated external tool gateway (MCP server reachable by URL).
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    url: Url,
    authorization_token: Option<String>,
}

impl GatewayConfig {
    /// Validates `url` and builds a gateway.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `url` does not parse.
    pub fn new(url: &str, authorization_token: Option<String>) -> Result<Self, AgentError> {
        let url = Url::parse(url.trim())
            .map_err(|e| AgentError::configuration("gateway.url", format!("invalid URL '{url}': {e}")))?;
        Ok(Self {
            url,
            authorization_token: authorization_token.filter(|t| !t.is_empty()),
        })
    }

    /// Returns the server URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Builds the request entry for this gateway.
    #[must_use]
    pub fn mcp_server(&self) -> McpServer {
        McpServer {
            server_type: "url".to_string(),
            url: self.url.to_string(),
            name: GATEWAY_NAME.to_string(),
            authorization_token: self.authorization_token.clone(),
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url.as_str())
            .field(
                "authorization_token",
                &self.authorization_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Fully resolved runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    /// Completion-service credential
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Output token cap per response
    pub max_tokens: u32,
    /// Completion requests per run
    pub max_turns: u32,
    /// Delegation levels below the top-level agent
    pub max_delegation_depth: u32,
    /// API base URL
    pub base_url: String,
    /// Request timeout
    pub request_timeout: Duration,
    /// Absolute write root, if configured
    pub write_root: Option<PathBuf>,
    /// External tool gateway, if configured
    pub gateway: Option<GatewayConfig>,
    /// Logging options
    pub logging: LoggingConfig,
}

impl Settings {
    /// Creates settings with built-in defaults and the given credential.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_turns: DEFAULT_MAX_TURNS,
            max_delegation_depth: DEFAULT_MAX_DELEGATION_DEPTH,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            write_root: None,
            gateway: None,
            logging: LoggingConfig::default(),
        }
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Sets the write root, resolving a relative path against `cwd`.
    #[must_use]
    pub fn with_write_root(mut self, write_root: impl AsRef<Path>, cwd: &Path) -> Self {
        self.write_root = Some(absolutize(write_root.as_ref(), cwd));
        self
    }

    /// Sets the gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: GatewayConfig) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Returns the write root for a sandbox rooted at `root`.
    #[must_use]
    pub fn write_root_for(&self, root: &Path) -> PathBuf {
        self.write_root
            .clone()
            .unwrap_or_else(|| root.join(DEFAULT_WRITE_ROOT))
    }

    /// Builds the completion client configuration.
    #[must_use]
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig::anthropic(self.api_key.clone())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(self.request_timeout)
    }

    /// Builds the orchestrator configuration.
    #[must_use]
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::new()
            .with_model(self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_max_turns(self.max_turns)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("max_turns", &self.max_turns)
            .field("max_delegation_depth", &self.max_delegation_depth)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("write_root", &self.write_root)
            .field("gateway", &self.gateway)
            .field("logging", &self.logging)
            .finish()
    }
}

/// Joins a relative `path` onto `cwd`.
pub(crate) fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::new("k");
        assert_eq!(settings.model, "claude-sonnet-4-5");
        assert_eq!(settings.max_tokens, 4096);
        assert_eq!(settings.max_turns, 10);
        assert_eq!(settings.max_delegation_depth, 1);
        assert_eq!(settings.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn write_root_defaults_under_sandbox() {
        let settings = Settings::new("k");
        assert_eq!(
            settings.write_root_for(Path::new("/repo")),
            PathBuf::from("/repo/workspace")
        );
    }

    #[test]
    fn relative_write_root_resolves_against_cwd() {
        let settings = Settings::new("k").with_write_root("out", Path::new("/home/dev"));
        assert_eq!(
            settings.write_root_for(Path::new("/repo")),
            PathBuf::from("/home/dev/out")
        );
    }

    #[test]
    fn gateway_rejects_bad_url() {
        let error = GatewayConfig::new("not a url", None).unwrap_err();
        assert!(error.is_configuration());
    }

    #[test]
    fn gateway_server_entry() {
        let gateway =
            GatewayConfig::new("https://mcp.example.com/sse", Some("tok".into())).unwrap();
        let server = gateway.mcp_server();
        assert_eq!(server.name, "example-mcp");
        assert_eq!(server.url, "https://mcp.example.com/sse");
        assert_eq!(server.authorization_token.as_deref(), Some("tok"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let settings = Settings::new("sk-ant-secret").with_gateway(
            GatewayConfig::new("https://mcp.example.com", Some("bearer-secret".into())).unwrap(),
        );
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(!rendered.contains("bearer-secret"));
    }

    #[test]
    fn orchestrator_config_carries_limits() {
        let config = Settings::new("k")
            .with_model("claude-haiku-4-5")
            .with_max_turns(3)
            .orchestrator_config();
        assert_eq!(config.model.as_deref(), Some("claude-haiku-4-5"));
        assert_eq!(config.max_turns, 3);
    }
}
