//! Anthropic API client.
//!
//! HTTP client for the Anthropic Messages API. Requests are sent whole and
//! answered whole; there is no streaming.

use crate::llm::client::{CompletionClient, CompletionRequest, CompletionResponse};
use crate::llm::config::ProviderConfig;
use crate::llm::error::LLMError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Seconds to wait when a 429 carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Client for the Anthropic Claude API.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: ProviderConfig,
}

/// Error response from the Anthropic API.
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

/// Error detail from the API.
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorDetail {
    #[serde(rename = "type")]
    error_type: String,
    message: String,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or the HTTP client cannot
    /// be created.
    pub fn new(config: ProviderConfig) -> Result<Self, LLMError> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::invalid_config("api_key", "API key is empty"));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LLMError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Returns a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Sends a messages request to the Anthropic API.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API returns an error.
    pub async fn send_messages(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LLMError> {
        let mut builder = self
            .client
            .post(self.config.messages_endpoint())
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("content-type", "application/json");
        if !request.betas.is_empty() {
            builder = builder.header("anthropic-beta", request.betas.join(","));
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        self.handle_response(response).await
    }

    /// Handles an API response.
    async fn handle_response(
        &self,
        response: reqwest::Response,
    ) -> Result<CompletionResponse, LLMError> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<CompletionResponse>()
                .await
                .map_err(|e| LLMError::parse_error(format!("failed to parse response: {e}")))
        } else {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            Err(error_from_parts(status, &headers, &body, &self.config.model))
        }
    }

    /// Maps a reqwest error to an LLMError.
    fn map_reqwest_error(&self, error: reqwest::Error) -> LLMError {
        if error.is_timeout() {
            LLMError::timeout(self.config.timeout)
        } else if error.is_connect() {
            LLMError::network(format!("connection failed: {error}"))
        } else {
            LLMError::network(error.to_string())
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LLMError> {
        self.send_messages(request).await
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Maps a non-success status, its headers, and its body to an `LLMError`.
fn error_from_parts(status: StatusCode, headers: &HeaderMap, body: &str, model: &str) -> LLMError {
    let status_code = status.as_u16();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = headers
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return LLMError::rate_limited(Duration::from_secs(retry_after));
    }

    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    if status == StatusCode::UNAUTHORIZED {
        let reason = parsed
            .map(|e| e.error.message)
            .unwrap_or_else(|| "invalid x-api-key".to_string());
        return LLMError::authentication_failed(reason);
    }
    if status_code == 529 {
        return LLMError::model_overloaded(model);
    }

    match parsed {
        Some(api_error) => match api_error.error.error_type.as_str() {
            "authentication_error" => LLMError::authentication_failed(api_error.error.message),
            "invalid_request_error" => LLMError::invalid_request(api_error.error.message),
            "overloaded_error" => LLMError::model_overloaded(model),
            _ => LLMError::api_error(
                status_code,
                api_error.error.message,
                Some(api_error.error.error_type),
            ),
        },
        None => LLMError::api_error(
            status_code,
            if body.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error")
            } else {
                body
            },
            None,
        ),
    }
}
