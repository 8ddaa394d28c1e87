//! Conversation callbacks.
//!
//! [`ConversationHandlers`] is the callback table a caller passes to
//! [`ConversationService::stream_conversation`](crate::ConversationService::stream_conversation).
//! Every method has a no-op default, so implementors override only the events
//! they care about. Three implementations ship with the crate:
//!
//! - [`NoopHandlers`]: ignores everything.
//! - [`CallbackHandlers`]: optional closures, set via builder methods.
//! - [`LoggingHandlers`]: emits `tracing` events.
//!
//! # Example
//!
//! ```rust,ignore
//! use chatshim::handlers::CallbackHandlers;
//!
//! let handlers = CallbackHandlers::new()
//!     .with_on_text(|delta| print!("{delta}"))
//!     .with_on_message(|message| println!("\n[{}]", message.stop_reason));
//!
//! service.stream_conversation(&request, &handlers).await?;
//! ```

use std::fmt;

use async_trait::async_trait;

use crate::service::FinalMessage;
use crate::tool::ToolUse;

/// Callbacks invoked while a conversation streams.
///
/// Calls happen sequentially from the task driving the stream, in arrival
/// order. Handlers cannot fail; a handler that needs to report an error must
/// do so out of band.
#[async_trait]
pub trait ConversationHandlers: Send + Sync {
    /// Called once per non-empty text fragment.
    async fn on_text(&self, _delta: &str) {}

    /// Called once with the assembled message after the stream completes.
    async fn on_message(&self, _message: &FinalMessage) {}

    /// Reserved for tool calling; not invoked yet.
    async fn on_tool_use(&self, _tool_use: &ToolUse) {}
}

/// A shared, thread-safe [`ConversationHandlers`] trait object.
pub type SharedConversationHandlers = std::sync::Arc<dyn ConversationHandlers>;

#[async_trait]
impl<H: ConversationHandlers + ?Sized> ConversationHandlers for std::sync::Arc<H> {
    async fn on_text(&self, delta: &str) {
        (**self).on_text(delta).await;
    }

    async fn on_message(&self, message: &FinalMessage) {
        (**self).on_message(message).await;
    }

    async fn on_tool_use(&self, tool_use: &ToolUse) {
        (**self).on_tool_use(tool_use).await;
    }
}

/// Handlers that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandlers;

#[async_trait]
impl ConversationHandlers for NoopHandlers {}

type TextFn = Box<dyn Fn(&str) + Send + Sync>;
type MessageFn = Box<dyn Fn(&FinalMessage) + Send + Sync>;
type ToolUseFn = Box<dyn Fn(&ToolUse) + Send + Sync>;

/// Handlers backed by optional closures. Unset closures are skipped.
#[derive(Default)]
pub struct CallbackHandlers {
    on_text: Option<TextFn>,
    on_message: Option<MessageFn>,
    on_tool_use: Option<ToolUseFn>,
}

impl CallbackHandlers {
    /// Creates a set with no closures.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the text-fragment closure.
    #[must_use]
    pub fn with_on_text<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_text = Some(Box::new(f));
        self
    }

    /// Sets the final-message closure.
    #[must_use]
    pub fn with_on_message<F>(mut self, f: F) -> Self
    where
        F: Fn(&FinalMessage) + Send + Sync + 'static,
    {
        self.on_message = Some(Box::new(f));
        self
    }

    /// Sets the tool-use closure.
    #[must_use]
    pub fn with_on_tool_use<F>(mut self, f: F) -> Self
    where
        F: Fn(&ToolUse) + Send + Sync + 'static,
    {
        self.on_tool_use = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for CallbackHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackHandlers")
            .field("on_text", &self.on_text.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_tool_use", &self.on_tool_use.is_some())
            .finish()
    }
}

#[async_trait]
impl ConversationHandlers for CallbackHandlers {
    async fn on_text(&self, delta: &str) {
        if let Some(f) = &self.on_text {
            f(delta);
        }
    }

    async fn on_message(&self, message: &FinalMessage) {
        if let Some(f) = &self.on_message {
            f(message);
        }
    }

    async fn on_tool_use(&self, tool_use: &ToolUse) {
        if let Some(f) = &self.on_tool_use {
            f(tool_use);
        }
    }
}

/// Handlers that log every event via `tracing`.
///
/// Fragments go to `trace`, completed messages to `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandlers;

#[async_trait]
impl ConversationHandlers for LoggingHandlers {
    async fn on_text(&self, delta: &str) {
        tracing::trace!(len = delta.len(), delta, "text fragment");
    }

    async fn on_message(&self, message: &FinalMessage) {
        tracing::debug!(
            chars = message.content.chars().count(),
            stop_reason = %message.stop_reason,
            "conversation turn complete"
        );
    }

    async fn on_tool_use(&self, tool_use: &ToolUse) {
        tracing::debug!(id = %tool_use.id, name = %tool_use.name, "tool use requested");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn unset_closures_are_noops() {
        let handlers = CallbackHandlers::new();
        handlers.on_text("ignored").await;
        handlers.on_message(&FinalMessage::end_turn("x")).await;
        assert!(format!("{handlers:?}").contains("on_text: false"));
    }

    #[tokio::test]
    async fn closures_receive_events() {
        let seen = Arc::new(Mutex::new(Vec::<String>::new()));
        let text_seen = Arc::clone(&seen);
        let msg_seen = Arc::clone(&seen);

        let handlers = CallbackHandlers::new()
            .with_on_text(move |d| text_seen.lock().unwrap().push(format!("text:{d}")))
            .with_on_message(move |m| msg_seen.lock().unwrap().push(format!("msg:{}", m.content)));

        handlers.on_text("a").await;
        handlers.on_message(&FinalMessage::end_turn("a")).await;

        assert_eq!(*seen.lock().unwrap(), vec!["text:a", "msg:a"]);
    }

    #[tokio::test]
    async fn tool_use_closure_receives_call() {
        let seen = Arc::new(Mutex::new(None::<String>));
        let sink = Arc::clone(&seen);
        let handlers = CallbackHandlers::new()
            .with_on_tool_use(move |t| *sink.lock().unwrap() = Some(t.name.clone()));

        let call = ToolUse {
            id: "call_1".to_owned(),
            name: "lookup".to_owned(),
            input: serde_json::Value::Null,
        };
        ConversationHandlers::on_tool_use(&handlers, &call).await;

        assert_eq!(seen.lock().unwrap().as_deref(), Some("lookup"));
    }

    #[tokio::test]
    async fn shared_handlers_delegate() {
        let count = Arc::new(Mutex::new(0_usize));
        let inner = Arc::clone(&count);
        let shared: SharedConversationHandlers =
            Arc::new(CallbackHandlers::new().with_on_text(move |_| *inner.lock().unwrap() += 1));

        shared.on_text("x").await;
        shared.on_text("y").await;
        NoopHandlers.on_text("z").await;
        LoggingHandlers.on_text("z").await;

        assert_eq!(*count.lock().unwrap(), 2);
    }
}
