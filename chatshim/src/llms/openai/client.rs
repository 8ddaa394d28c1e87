//! OpenAI API client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::error::{LlmError, Result};
use crate::message::Message;
use crate::provider::ChatRequest;

use super::config::OpenAIConfig;
use super::types::{OpenAIChatRequest, OpenAIErrorResponse, OpenAIMessage};

/// OpenAI API client.
#[derive(Debug, Clone)]
pub struct OpenAI {
    pub(crate) config: Arc<OpenAIConfig>,
    pub(crate) client: Client,
}

impl OpenAI {
    /// Create a new OpenAI client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an auth error for an empty API key, or an internal error if
    /// the HTTP client cannot be built.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(LlmError::auth("openai", "API key is required").into());
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let client = builder
            .build()
            .map_err(|e| LlmError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }

    /// Create a client from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an auth error if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig::from_env()?;
        Self::new(config)
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build the chat completions URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build an authenticated JSON POST request.
    pub(crate) fn build_request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream");

        if let Some(org) = &self.config.organization {
            req = req.header("OpenAI-Organization", org);
        }

        req
    }

    /// Convert a message to OpenAI format, flattening structured content.
    pub(crate) fn convert_message(msg: &Message) -> Result<OpenAIMessage> {
        Ok(OpenAIMessage {
            role: msg.role.as_str().to_owned(),
            content: msg.content.to_text()?.into_owned(),
        })
    }

    /// Build the streaming request body.
    pub(crate) fn build_body(request: &ChatRequest) -> Result<OpenAIChatRequest> {
        let messages = request
            .messages
            .iter()
            .map(Self::convert_message)
            .collect::<Result<Vec<_>>>()?;

        Ok(OpenAIChatRequest {
            model: request.model.clone(),
            messages,
            max_tokens: request.max_tokens.filter(|&n| n > 0),
            stream: true,
        })
    }

    /// Parse an error response from OpenAI.
    pub(crate) fn parse_error(status: u16, body: &str) -> LlmError {
        match status {
            401 | 403 => {
                let message = serde_json::from_str::<OpenAIErrorResponse>(body)
                    .map_or_else(|_| body.to_owned(), |r| r.error.message);
                return LlmError::auth("openai", message);
            }
            429 => return LlmError::rate_limited("openai"),
            _ => {}
        }

        if let Ok(error_response) = serde_json::from_str::<OpenAIErrorResponse>(body) {
            return error_response.error.into_llm_error(|| status.to_string());
        }

        LlmError::http_status(status, body.to_owned())
    }
}
