//! Completion provider configuration.

use std::fmt;
use std::time::Duration;

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Default output token cap per response.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Configuration for the Anthropic client.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// The API key for authentication
    pub api_key: String,
    /// The model to use
    pub model: String,
    /// Base URL for the API
    pub base_url: String,
    /// API version header
    pub api_version: String,
    /// Request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    /// Creates a new provider configuration for Anthropic.
    ///
    /// # Examples
    ///
    /// ```
    /// use coding_agent::llm::ProviderConfig;
    ///
    /// let config = ProviderConfig::anthropic("sk-ant-api03-...");
    /// assert_eq!(config.model, "claude-sonnet-4-5");
    /// ```
    #[must_use]
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            api_version: "2023-06-01".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the model to use.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL for the API.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the full API endpoint URL for messages.
    #[must_use]
    pub fn messages_endpoint(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anthropic_defaults() {
        let config = ProviderConfig::anthropic("test-key");
        assert_eq!(config.api_version, "2023-06-01");
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(
            config.messages_endpoint(),
            "https://api.anthropic.com/v1/messages"
        );
    }

    #[test]
    fn builder_overrides() {
        let config = ProviderConfig::anthropic("k")
            .with_model("claude-opus-4-1")
            .with_base_url("http://localhost:8080/")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "claude-opus-4-1");
        assert_eq!(config.messages_endpoint(), "http://localhost:8080/v1/messages");
    }

    #[test]
    fn debug_redacts_api_key() {
        let rendered = format!("{:?}", ProviderConfig::anthropic("sk-ant-secret"));
        assert!(!rendered.contains("sk-ant-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
