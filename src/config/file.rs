//! Configuration file loading.
//!
//! This module handles loading coding-agent configuration from TOML files
//! at XDG-compliant locations.

use crate::config::types::FileConfig;
use crate::error::AgentError;
use std::path::{Path, PathBuf};

/// Default configuration file name for project-local config.
const LOCAL_CONFIG_NAME: &str = "coding-agent.toml";

/// Default configuration file name within XDG config directory.
const XDG_CONFIG_NAME: &str = "config.toml";

/// Application name for XDG directory lookup.
const APP_NAME: &str = "coding-agent";

/// Loads configuration from the default search paths.
///
/// Search order:
/// 1. `./coding-agent.toml` (project-local)
/// 2. `~/.config/coding-agent/config.toml` (XDG config)
///
/// Returns an empty configuration if no config file is found.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be parsed.
pub fn load() -> Result<FileConfig, AgentError> {
    match search_paths().into_iter().find(|path| path.exists()) {
        Some(path) => from_path(&path),
        None => Ok(FileConfig::default()),
    }
}

/// Loads configuration from a specific file path.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file contains invalid TOML
/// - The TOML doesn't match the expected schema
pub fn from_path(path: &Path) -> Result<FileConfig, AgentError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        AgentError::configuration(
            "config_file",
            format!("failed to read '{}': {e}", path.display()),
        )
    })?;

    from_str(&contents).map_err(|e| {
        AgentError::configuration(
            "config_file",
            format!("failed to parse '{}': {e}", path.display()),
        )
    })
}

/// Parses configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or doesn't match the schema.
///
/// # Example
///
/// ```rust,ignore
/// use coding_agent::config::from_str;
///
/// let config = from_str("model = \"claude-sonnet-4-5\"\nmax_turns = 12")?;
/// ```
pub fn from_str(toml_str: &str) -> Result<FileConfig, AgentError> {
    toml::from_str(toml_str)
        .map_err(|e| AgentError::configuration("config", format!("invalid TOML: {e}")))
}

/// Returns the paths that would be searched for configuration files.
#[must_use]
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_NAME)];

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join(APP_NAME).join(XDG_CONFIG_NAME));
    }

    paths
}
