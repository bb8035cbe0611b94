//! Conversation data model shared by the orchestrator, the registry, and the
//! completion client.

mod types;

pub use types::*;
