//! OpenAI Chat Completions wire types.
//!
//! Internal types used for serialization/deserialization with the API. Only
//! the fields the streaming text path reads are modeled; everything else in
//! a response is ignored.

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Streaming chat completion request body.
#[derive(Debug, Clone, Serialize)]
pub struct OpenAIChatRequest {
    pub model: String,
    pub messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub stream: bool,
}

/// OpenAI message format. Content is always text on this path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAIMessage {
    pub role: String,
    pub content: String,
}

/// OpenAI streaming chunk (`chat.completion.chunk`).
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIStreamChunk {
    #[serde(default)]
    pub choices: Vec<OpenAIStreamChoice>,
    /// Set when the server aborts the stream with an error event.
    #[serde(default)]
    pub error: Option<OpenAIError>,
}

/// OpenAI stream choice.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIStreamChoice {
    #[serde(default)]
    pub delta: OpenAIStreamDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// OpenAI stream delta.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAIStreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

/// OpenAI error response.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIErrorResponse {
    pub error: OpenAIError,
}

/// OpenAI error details.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAIError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl OpenAIError {
    /// Convert into a provider error, using `fallback_code` when the server
    /// sent neither a code nor a type.
    pub fn into_llm_error(self, fallback_code: impl FnOnce() -> String) -> LlmError {
        let code = self.code.or(self.error_type).unwrap_or_else(fallback_code);
        LlmError::provider_code("openai", code, self.message)
    }
}
