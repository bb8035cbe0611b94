//! Tool system.
//!
//! This module provides everything between a model's tool invocation and
//! the filesystem:
//!
//! - **Sandbox** (`security`): read containment under the repository root,
//!   write containment under a separate write root
//! - **Definitions**: the closed set of tool kinds, their schemas, and typed
//!   argument parsing
//! - **Built-ins**: one module per tool
//! - **Registry**: permission filtering, schema export, and dispatch
//!
//! ## Dispatch
//!
//! ```text
//! ToolInvocation { id, name, input }
//!        |
//!        v
//! ToolRegistry::lookup(name) --unknown/disabled--> error text
//!        |
//!        v
//! ToolRequest::parse(kind, input) --invalid--> error text
//!        |
//!        v
//! builtins::<tool>::run(args, ..) --> ToolResult { tool_use_id: id, text }
//! ```

pub mod builtins;
pub mod definition;
pub mod error;
pub mod registry;
pub mod security;

pub use definition::{PermissionMode, ServerTool, ToolDefinition, ToolKind, ToolRequest, ToolSpec};
pub use error::{IoOperation, ToolError, ToolErrorKind};
pub use registry::{ToolRegistry, WEB_SEARCH_MAX_USES};
pub use security::{Sandbox, SandboxError};
