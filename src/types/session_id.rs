//! Orchestration session identifier.
//!
//! Every orchestrator instance, including delegated sub-agents, carries a
//! `SessionId` so interleaved log lines can be told apart.
//! Format: `session_01h455vb4pex5vsknk084sn02q`

use mti::prelude::*;
use std::fmt;

/// A time-sortable TypeID naming one orchestration instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(MagicTypeId);

impl SessionId {
    /// The TypeID prefix for session identifiers.
    pub const PREFIX: &'static str = "session";

    /// Creates a fresh identifier backed by a UUIDv7.
    #[must_use]
    pub fn new() -> Self {
        Self(Self::PREFIX.create_type_id::<V7>())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_carry_session_prefix() {
        let id = SessionId::new();
        assert!(id.to_string().starts_with("session_"));
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn display_is_a_typeid() {
        let rendered = SessionId::new().to_string();
        let suffix = rendered.strip_prefix("session_").unwrap();
        assert_eq!(suffix.len(), 26);
    }
}
