//! The chat-completion provider seam.
//!
//! [`ChatStreamProvider`] is the only capability the conversation service
//! needs from a backend: given role-tagged text messages and model
//! parameters, return an asynchronous stream of chunks. The OpenAI client in
//! [`crate::llms::openai`] is the production implementation; tests substitute
//! capturing stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::stream::ChunkStream;

/// A streaming chat-completion request.
///
/// Messages are expected to carry text content only; the service normalizes
/// structured content before building a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model identifier.
    pub model: String,

    /// Conversation messages, system prompt first.
    pub messages: Vec<Message>,

    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a request for `model` with no messages.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Create a request with the given messages.
    #[must_use]
    pub fn with_messages(model: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
        }
    }

    /// Append a message.
    #[must_use]
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the token limit.
    #[must_use]
    pub const fn max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// A backend that streams chat completions.
///
/// Failures, whether returned from [`chat_stream`](Self::chat_stream) itself or
/// yielded mid-stream, are surfaced to callers unchanged.
#[async_trait]
pub trait ChatStreamProvider: Send + Sync {
    /// Start a streaming completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or is rejected.
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream>;

    /// Get the name of this provider, used in logs and errors.
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<P: ChatStreamProvider + ?Sized> ChatStreamProvider for std::sync::Arc<P> {
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        (**self).chat_stream(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
