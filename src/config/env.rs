//! Environment variables and layering.

use crate::config::types::{absolutize, FileConfig, GatewayConfig, Settings};
use crate::error::AgentError;
use std::path::Path;
use std::time::Duration;

/// Completion-service credential.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
/// Write-root override.
pub const WRITE_ROOT_VAR: &str = "AGENT_WRITE_ROOT";
/// Tool gateway URL.
pub const MCP_URL_VAR: &str = "AGENT_MCP_URL";
/// Tool gateway bearer token.
pub const MCP_TOKEN_VAR: &str = "AGENT_MCP_TOKEN";

/// The environment variables the agent reads. Empty values count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    /// `ANTHROPIC_API_KEY`
    pub api_key: Option<String>,
    /// `AGENT_WRITE_ROOT`
    pub write_root: Option<String>,
    /// `AGENT_MCP_URL`
    pub mcp_url: Option<String>,
    /// `AGENT_MCP_TOKEN`
    pub mcp_token: Option<String>,
}

impl EnvVars {
    /// Reads the variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        Self {
            api_key: get(API_KEY_VAR),
            write_root: get(WRITE_ROOT_VAR),
            mcp_url: get(MCP_URL_VAR),
            mcp_token: get(MCP_TOKEN_VAR),
        }
    }

    /// Reads the variables from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

/// Layers `file` and then `env` over the built-in defaults.
///
/// Relative paths resolve against `cwd`.
///
/// # Errors
///
/// Returns `MissingCredential` if no API key is set, or a configuration
/// error if the gateway URL does not parse.
pub fn resolve(file: FileConfig, env: &EnvVars, cwd: &Path) -> Result<Settings, AgentError> {
    let api_key = env
        .api_key
        .clone()
        .ok_or_else(|| AgentError::missing_credential(API_KEY_VAR))?;

    let mut settings = Settings::new(api_key);
    if let Some(model) = file.model {
        settings.model = model;
    }
    if let Some(max_tokens) = file.max_tokens {
        settings.max_tokens = max_tokens;
    }
    if let Some(max_turns) = file.max_turns {
        settings.max_turns = max_turns;
    }
    if let Some(depth) = file.max_delegation_depth {
        settings.max_delegation_depth = depth;
    }
    if let Some(base_url) = file.base_url {
        settings.base_url = base_url;
    }
    if let Some(secs) = file.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }
    if let Some(logging) = file.logging {
        settings.logging = logging;
    }

    let write_root = env
        .write_root
        .as_deref()
        .map(Path::new)
        .or(file.write_root.as_deref());
    settings.write_root = write_root.map(|root| absolutize(root, cwd));

    let file_gateway = file.gateway.unwrap_or_default();
    let url = env.mcp_url.clone().or(file_gateway.url);
    let token = env.mcp_token.clone().or(file_gateway.token);
    if let Some(url) = url {
        settings.gateway = Some(GatewayConfig::new(&url, token)?);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::GatewayFileConfig;
    use crate::error::AgentErrorKind;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn env(pairs: &[(&str, &str)]) -> EnvVars {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EnvVars::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn missing_api_key_is_reported() {
        let error = resolve(FileConfig::default(), &env(&[]), Path::new("/")).unwrap_err();
        assert_eq!(
            error.kind,
            AgentErrorKind::MissingCredential {
                variable: "ANTHROPIC_API_KEY".into()
            }
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let vars = env(&[("ANTHROPIC_API_KEY", "  "), ("AGENT_MCP_URL", "")]);
        assert_eq!(vars, EnvVars::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let file = FileConfig {
            model: Some("claude-opus-4-1".into()),
            max_turns: Some(4),
            ..FileConfig::default()
        };
        let settings = resolve(file, &env(&[("ANTHROPIC_API_KEY", "k")]), Path::new("/")).unwrap();
        assert_eq!(settings.model, "claude-opus-4-1");
        assert_eq!(settings.max_turns, 4);
        assert_eq!(settings.max_tokens, 4096);
    }

    #[test]
    fn env_write_root_beats_file() {
        let file = FileConfig {
            write_root: Some(PathBuf::from("from-file")),
            ..FileConfig::default()
        };
        let vars = env(&[("ANTHROPIC_API_KEY", "k"), ("AGENT_WRITE_ROOT", "from-env")]);
        let settings = resolve(file, &vars, Path::new("/work")).unwrap();
        assert_eq!(settings.write_root, Some(PathBuf::from("/work/from-env")));
    }

    #[test]
    fn gateway_from_env_with_file_token() {
        let file = FileConfig {
            gateway: Some(GatewayFileConfig {
                url: Some("https://ignored.example.com".into()),
                token: Some("file-token".into()),
            }),
            ..FileConfig::default()
        };
        let vars = env(&[
            ("ANTHROPIC_API_KEY", "k"),
            ("AGENT_MCP_URL", "https://mcp.example.com/sse"),
        ]);
        let settings = resolve(file, &vars, Path::new("/")).unwrap();
        let server = settings.gateway.unwrap().mcp_server();
        assert_eq!(server.url, "https://mcp.example.com/sse");
        assert_eq!(server.authorization_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn invalid_gateway_url_is_configuration_error() {
        let vars = env(&[("ANTHROPIC_API_KEY", "k"), ("AGENT_MCP_URL", "::nope::")]);
        let error = resolve(FileConfig::default(), &vars, Path::new("/")).unwrap_err();
        assert!(error.is_configuration());
    }
}
