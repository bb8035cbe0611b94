//! Completion-service boundary.
//!
//! This module contains the `CompletionClient` trait, the request and
//! response types sent over it, and the Anthropic Messages API client.

mod anthropic;
mod client;
mod config;
mod error;

pub use anthropic::AnthropicClient;
pub use client::{
    AutoChoice, CompletionClient, CompletionRequest, CompletionResponse, McpServer, SystemBlock,
    ToolChoice, Usage,
};
pub use config::{ProviderConfig, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
pub use error::{LLMError, LLMErrorKind};
