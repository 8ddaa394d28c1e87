//! Message types for conversations.
//!
//! Callers hand the service an ordered list of [`Message`]s. Content may be
//! plain text or an arbitrary structured JSON value (for example a message
//! body that was stored as parsed JSON); chat-completion providers only accept
//! text, so structured content is flattened to a string before transmission.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System message providing instructions.
    System,
    /// User message.
    User,
    /// Assistant (model) message.
    Assistant,
}

impl Role {
    /// Get the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Content of a message: text, or any structured JSON value.
///
/// Deserializes untagged, so a JSON string becomes [`MessageContent::Text`]
/// and every other JSON value becomes [`MessageContent::Structured`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content.
    Text(String),
    /// Structured content (content blocks, stored JSON, ...).
    Structured(Value),
}

impl MessageContent {
    /// Returns the text if this is plain text content.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Structured(Value::String(text)) => Some(text),
            Self::Structured(_) => None,
        }
    }

    /// Returns the content as a string suitable for a text-only provider.
    ///
    /// Text passes through borrowed; structured content is serialized as
    /// compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the structured value cannot be serialized.
    pub fn to_text(&self) -> serde_json::Result<Cow<'_, str>> {
        match self {
            Self::Text(text) | Self::Structured(Value::String(text)) => Ok(Cow::Borrowed(text)),
            Self::Structured(value) => serde_json::to_string(value).map(Cow::Owned),
        }
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for MessageContent {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            other => Self::Structured(other),
        }
    }
}

/// A single role-tagged message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who authored the message.
    pub role: Role,
    /// The message body.
    pub content: MessageContent,
}

impl Message {
    /// Create a message with the given role and content.
    #[must_use]
    pub fn new(role: Role, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message.
    #[must_use]
    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::System, content)
    }

    /// Create a user message.
    #[must_use]
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Returns a copy of this message whose content is guaranteed to be text.
    ///
    /// # Errors
    ///
    /// Returns an error if structured content cannot be serialized.
    pub fn to_text_message(&self) -> serde_json::Result<Self> {
        let text = self.content.to_text()?.into_owned();
        Ok(Self::new(self.role, text))
    }
}
