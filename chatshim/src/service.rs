//! The conversation streaming service.
//!
//! [`ConversationService`] keeps the legacy conversation interface
//! (`stream_conversation` plus `system_prompt`) while delegating generation
//! to any [`ChatStreamProvider`]. Each call:
//!
//! 1. resolves the system prompt for the request's prompt type,
//! 2. flattens structured message content to text,
//! 3. prepends the system prompt and starts a provider stream,
//! 4. forwards every text fragment to [`ConversationHandlers::on_text`],
//! 5. hands the assembled [`FinalMessage`] to
//!    [`ConversationHandlers::on_message`] and returns it.
//!
//! The returned message always carries [`END_TURN`] as its stop reason, which
//! is what tells a caller's "keep streaming while the model wants another
//! turn" loop to stop.

use std::sync::Arc;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::AppConfig;
use crate::error::Result;
use crate::handlers::ConversationHandlers;
use crate::llms::openai::{OpenAI, OpenAIConfig};
use crate::message::{Message, Role};
use crate::prompts::PromptTable;
use crate::provider::{ChatRequest, ChatStreamProvider};
use crate::tool::ToolDefinition;

/// Stop reason reported on every completed turn.
pub const END_TURN: &str = "end_turn";

/// A conversation turn request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationRequest {
    /// Ordered conversation history. Not validated; an empty list is passed
    /// through to the provider.
    pub messages: Vec<Message>,

    /// Prompt type selecting the system prompt. Defaults to the configured
    /// default prompt type.
    #[serde(default, alias = "promptType", skip_serializing_if = "Option::is_none")]
    pub prompt_type: Option<String>,

    /// Tools offered to the model. Accepted but not forwarded yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
}

impl ConversationRequest {
    /// Create a request from a message history.
    #[must_use]
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Select a prompt type.
    #[must_use]
    pub fn prompt_type(mut self, prompt_type: impl Into<String>) -> Self {
        self.prompt_type = Some(prompt_type.into());
        self
    }

    /// Attach tool definitions.
    #[must_use]
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = Some(tools);
        self
    }
}

/// The assembled assistant message produced by one streaming call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalMessage {
    /// Always [`Role::Assistant`].
    pub role: Role,
    /// Concatenation of every streamed text fragment.
    pub content: String,
    /// Always [`END_TURN`].
    pub stop_reason: String,
}

impl FinalMessage {
    /// Creates an assistant message that ends the turn.
    #[must_use]
    pub fn end_turn(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            stop_reason: END_TURN.to_owned(),
        }
    }

    /// Returns `true` if the caller's loop should stop.
    #[must_use]
    pub fn is_end_turn(&self) -> bool {
        self.stop_reason == END_TURN
    }
}

/// Streams conversations through a chat-completion provider.
///
/// Configuration and prompts are immutable and shared, so a service can be
/// cloned cheaply (when its provider can) and used from many tasks.
#[derive(Debug, Clone)]
pub struct ConversationService<P> {
    provider: P,
    config: Arc<AppConfig>,
    prompts: Arc<PromptTable>,
}

/// Build a service backed by OpenAI, loading config and prompts from their
/// default locations.
///
/// When `api_key` is `None` the key is read from `OPENAI_API_KEY`.
///
/// # Errors
///
/// Returns an error if no API key is available, or if the config or prompt
/// file exists but is invalid.
pub fn create_service(api_key: Option<String>) -> Result<ConversationService<OpenAI>> {
    let openai_config = match api_key {
        Some(key) => OpenAIConfig::new(key).with_env_overrides(),
        None => OpenAIConfig::from_env()?,
    };
    let provider = OpenAI::new(openai_config)?;
    let config = AppConfig::load()?;
    let prompts = PromptTable::load()?;

    Ok(ConversationService::new(
        provider,
        Arc::new(config),
        Arc::new(prompts),
    ))
}

impl<P: ChatStreamProvider> ConversationService<P> {
    /// Create a service from its parts.
    #[must_use]
    pub const fn new(provider: P, config: Arc<AppConfig>, prompts: Arc<PromptTable>) -> Self {
        Self {
            provider,
            config,
            prompts,
        }
    }

    /// The underlying provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolve the system prompt for `prompt_type`.
    ///
    /// Falls back to the configured default type, then to the generic
    /// fallback prompt. Never fails.
    #[must_use]
    pub fn system_prompt(&self, prompt_type: &str) -> &str {
        self.prompts
            .resolve(prompt_type, &self.config.api.default_prompt_type)
    }

    /// Build the provider request for a conversation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if structured content
    /// cannot be serialized.
    pub fn build_chat_request(&self, request: &ConversationRequest) -> Result<ChatRequest> {
        let prompt_type = request
            .prompt_type
            .as_deref()
            .unwrap_or(self.config.api.default_prompt_type.as_str());
        let system = self.system_prompt(prompt_type);

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(Message::system(system));
        for message in &request.messages {
            messages.push(message.to_text_message()?);
        }

        Ok(ChatRequest::with_messages(self.config.api.model(), messages)
            .max_tokens(self.config.api.max_tokens()))
    }

    /// Stream one assistant turn.
    ///
    /// Fragments reach `handlers.on_text` in arrival order; the assembled
    /// message reaches `handlers.on_message` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Provider failures are returned unchanged, whether the call is rejected
    /// up front or the stream fails part-way. In the latter case fragments
    /// already delivered stay delivered and `on_message` is not called.
    pub async fn stream_conversation(
        &self,
        request: &ConversationRequest,
        handlers: &dyn ConversationHandlers,
    ) -> Result<FinalMessage> {
        if let Some(tools) = &request.tools {
            debug!(count = tools.len(), "tool definitions ignored");
        }

        let chat_request = self.build_chat_request(request)?;
        debug!(
            provider = self.provider.provider_name(),
            model = %chat_request.model,
            messages = chat_request.messages.len(),
            prompt_type = request.prompt_type.as_deref().unwrap_or("<default>"),
            "starting conversation stream"
        );

        let mut stream = self.provider.chat_stream(&chat_request).await?;
        let mut content = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if let Some(delta) = chunk.as_text()
                && !delta.is_empty()
            {
                trace!(len = delta.len(), "received fragment");
                content.push_str(delta);
                handlers.on_text(delta).await;
            }
        }

        let message = FinalMessage::end_turn(content);
        handlers.on_message(&message).await;

        Ok(message)
    }
}
