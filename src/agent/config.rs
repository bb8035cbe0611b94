//! Orchestrator configuration.

use crate::llm::DEFAULT_MAX_TOKENS;

/// Default cap on completion requests per `run`.
pub const DEFAULT_MAX_TURNS: u32 = 10;

/// Configuration for one orchestration instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Model override; the client's model when `None`
    pub model: Option<String>,
    /// Output token cap per response
    pub max_tokens: u32,
    /// Completion requests per `run`
    pub max_turns: u32,
}

impl OrchestratorConfig {
    /// Creates a configuration with default limits.
    ///
    /// # Examples
    ///
    /// ```
    /// use coding_agent::agent::OrchestratorConfig;
    ///
    /// let config = OrchestratorConfig::new().with_max_turns(3);
    /// assert_eq!(config.max_turns, 3);
    /// assert_eq!(config.max_tokens, 4096);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the output token cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the turn cap. Zero is raised to one.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns.max(1);
        self
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}
