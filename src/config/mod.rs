//! Configuration management.
//!
//! Settings are layered, lowest precedence first:
//! 1. built-in defaults;
//! 2. the first TOML file found at `./coding-agent.toml` or
//!    `~/.config/coding-agent/config.toml`;
//! 3. environment variables (after loading `.env`);
//! 4. command-line flags, applied by the binary.
//!
//! # Example Configuration
//!
//! ```toml
//! model = "claude-sonnet-4-5"
//! max_turns = 10
//! max_delegation_depth = 1
//! write_root = "workspace"
//!
//! [gateway]
//! url = "https://mcp.example.com/sse"
//! token = "..."
//!
//! [logging]
//! file = true
//! ```
//!
//! Settings are resolved once at startup; nothing below this module reads
//! the process environment.

mod env;
mod file;
mod types;

pub use env::{resolve, EnvVars, API_KEY_VAR, MCP_TOKEN_VAR, MCP_URL_VAR, WRITE_ROOT_VAR};
pub use file::{from_path, from_str, load, search_paths};
pub use types::{
    FileConfig, GatewayConfig, GatewayFileConfig, Settings, DEFAULT_MAX_DELEGATION_DEPTH,
    DEFAULT_WRITE_ROOT, GATEWAY_NAME, MCP_BETA_FLAG,
};

use crate::error::AgentError;
use std::path::Path;

/// Loads `.env`, the config file, and the environment, in that order.
///
/// # Errors
///
/// Returns an error if the config file is malformed, the API key is
/// missing, or a configured value is invalid.
pub fn load_settings(cwd: &Path) -> Result<Settings, AgentError> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "loaded .env");
    }
    let file = load()?;
    resolve(file, &EnvVars::from_process(), cwd)
}
