//! Tool kinds, definitions, and typed requests.
//!
//! The set of local tools is closed: [`ToolKind`] enumerates every tool the
//! agent can execute, and [`ToolRequest`] carries each kind's typed input.
//! Names the model invents fall outside the enum and are answered by the
//! registry with an "unknown tool" result.

use crate::tools::builtins::{
    ask_user, delegate_task, read_file, save_memory, search_files, search_in_files, write_file,
};
use crate::tools::error::ToolError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declarative description of a locally executed tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool name the model uses to invoke it
    pub name: String,
    /// When and how to use the tool
    pub description: String,
    /// JSON Schema of the accepted input
    pub input_schema: Value,
}

/// A tool executed by the provider itself; never dispatched locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTool {
    /// Versioned provider tool type
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Tool name
    pub name: String,
    /// Per-request usage cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
}

impl ServerTool {
    /// The provider-hosted web search tool.
    #[must_use]
    pub fn web_search(max_uses: u32) -> Self {
        Self {
            tool_type: "web_search_20250305".to_string(),
            name: "web_search".to_string(),
            max_uses: Some(max_uses),
        }
    }
}

/// Either kind of tool declaration, as sent in a completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolSpec {
    /// Executed by this process
    Client(ToolDefinition),
    /// Executed by the provider
    Server(ServerTool),
}

impl ToolSpec {
    /// Returns the declared tool name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Client(definition) => &definition.name,
            Self::Server(tool) => &tool.name,
        }
    }
}

/// Whether a registry may run tools that modify the working tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Only non-mutating tools are exposed or executed
    ReadOnly,
    /// All tools are available
    #[default]
    ReadWrite,
}

impl PermissionMode {
    /// Returns true if mutating tools are allowed.
    #[must_use]
    pub fn allows_writes(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

impl std::fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "Read-Only"),
            Self::ReadWrite => write!(f, "Read-Write"),
        }
    }
}

/// Every locally executable tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Ask the operator a clarifying question
    AskUser,
    /// Glob search for file names
    SearchFiles,
    /// Substring search in file contents
    SearchInFiles,
    /// Read one text file
    ReadFile,
    /// Create or overwrite one text file
    WriteFile,
    /// Append to the persistent memory file
    SaveMemory,
    /// Hand a sub-task to a read-only sub-agent
    DelegateTask,
}

impl ToolKind {
    /// All kinds, in the order their definitions are presented to the model.
    pub const ALL: [ToolKind; 7] = [
        Self::AskUser,
        Self::SearchFiles,
        Self::SearchInFiles,
        Self::ReadFile,
        Self::WriteFile,
        Self::SaveMemory,
        Self::DelegateTask,
    ];

    /// Returns the wire name of this tool.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::AskUser => "ask_user",
            Self::SearchFiles => "search_files",
            Self::SearchInFiles => "search_in_files",
            Self::ReadFile => "read_file",
            Self::WriteFile => "write_file",
            Self::SaveMemory => "save_memory",
            Self::DelegateTask => "delegate_task",
        }
    }

    /// Looks up a kind by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Returns true if this tool changes files on disk.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        matches!(self, Self::WriteFile | Self::SaveMemory)
    }

    /// Returns the definition presented to the model.
    #[must_use]
    pub fn definition(self) -> ToolDefinition {
        match self {
            Self::AskUser => ask_user::definition(),
            Self::SearchFiles => search_files::definition(),
            Self::SearchInFiles => search_in_files::definition(),
            Self::ReadFile => read_file::definition(),
            Self::WriteFile => write_file::definition(),
            Self::SaveMemory => save_memory::definition(),
            Self::DelegateTask => delegate_task::definition(),
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A tool call with its input parsed into the kind's argument type.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    /// `ask_user`
    AskUser(ask_user::AskUserArgs),
    /// `search_files`
    SearchFiles(search_files::SearchFilesArgs),
    /// `search_in_files`
    SearchInFiles(search_in_files::SearchInFilesArgs),
    /// `read_file`
    ReadFile(read_file::ReadFileArgs),
    /// `write_file`
    WriteFile(write_file::WriteFileArgs),
    /// `save_memory`
    SaveMemory(save_memory::SaveMemoryArgs),
    /// `delegate_task`
    DelegateTask(delegate_task::DelegateTaskArgs),
}

impl ToolRequest {
    /// Parses `input` as the arguments of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `ToolError` with kind `InvalidArguments` when the input does
    /// not match the tool's argument type.
    pub fn parse(kind: ToolKind, input: &Value) -> Result<Self, ToolError> {
        fn args<T: DeserializeOwned>(kind: ToolKind, input: &Value) -> Result<T, ToolError> {
            T::deserialize(input).map_err(|e| ToolError::invalid_arguments(kind.name(), e.to_string()))
        }

        Ok(match kind {
            ToolKind::AskUser => Self::AskUser(args(kind, input)?),
            ToolKind::SearchFiles => Self::SearchFiles(args(kind, input)?),
            ToolKind::SearchInFiles => Self::SearchInFiles(args(kind, input)?),
            ToolKind::ReadFile => Self::ReadFile(args(kind, input)?),
            ToolKind::WriteFile => Self::WriteFile(args(kind, input)?),
            ToolKind::SaveMemory => Self::SaveMemory(args(kind, input)?),
            ToolKind::DelegateTask => Self::DelegateTask(args(kind, input)?),
        })
    }

    /// Returns the kind of this request.
    #[must_use]
    pub fn kind(&self) -> ToolKind {
        match self {
            Self::AskUser(_) => ToolKind::AskUser,
            Self::SearchFiles(_) => ToolKind::SearchFiles,
            Self::SearchInFiles(_) => ToolKind::SearchInFiles,
            Self::ReadFile(_) => ToolKind::ReadFile,
            Self::WriteFile(_) => ToolKind::WriteFile,
            Self::SaveMemory(_) => ToolKind::SaveMemory,
            Self::DelegateTask(_) => ToolKind::DelegateTask,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_round_trip_through_from_name() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
            assert_eq!(kind.definition().name, kind.name());
        }
        assert_eq!(ToolKind::from_name("bash"), None);
    }

    #[test]
    fn only_write_and_memory_are_mutating() {
        let mutating: Vec<_> = ToolKind::ALL
            .into_iter()
            .filter(|kind| kind.is_mutating())
            .collect();
        assert_eq!(mutating, vec![ToolKind::WriteFile, ToolKind::SaveMemory]);
    }

    #[test]
    fn web_search_serializes_in_provider_shape() {
        let spec = ToolSpec::Server(ServerTool::web_search(3));
        assert_eq!(
            serde_json::to_value(spec).unwrap(),
            json!({"type": "web_search_20250305", "name": "web_search", "max_uses": 3})
        );
    }

    #[test]
    fn client_spec_serializes_as_plain_definition() {
        let spec = ToolSpec::Client(ToolKind::ReadFile.definition());
        let value = serde_json::to_value(spec).unwrap();
        assert_eq!(value["name"], "read_file");
        assert!(value.get("type").is_none());
        assert_eq!(value["input_schema"]["required"], json!(["path"]));
    }

    #[test]
    fn parse_produces_typed_request() {
        let request = ToolRequest::parse(ToolKind::SearchFiles, &json!({"pattern": "*.py"})).unwrap();
        assert_eq!(request.kind(), ToolKind::SearchFiles);
    }

    #[test]
    fn parse_rejects_missing_required_field() {
        let error = ToolRequest::parse(ToolKind::ReadFile, &json!({})).unwrap_err();
        assert!(error.to_result_text().contains("invalid arguments for read_file"));
    }

    #[test]
    fn permission_mode_defaults_to_read_write() {
        assert!(PermissionMode::default().allows_writes());
        assert!(!PermissionMode::ReadOnly.allows_writes());
    }
}
