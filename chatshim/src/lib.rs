//! Chatshim - a legacy conversation-service interface over OpenAI-compatible
//! streaming chat completions.
//!
//! Callers written against an Anthropic-shaped service (stream a turn, receive
//! text fragments through callbacks, stop when `stop_reason == "end_turn"`)
//! keep working unchanged while generation is served by any
//! [`ChatStreamProvider`], with [`OpenAI`](llms::OpenAI) as the built-in one.
//!
//! # Example
//!
//! ```rust,ignore
//! use chatshim::prelude::*;
//!
//! let service = create_service(None)?;
//! let request = ConversationRequest::new(vec![Message::user("Hello!")]);
//! let handlers = CallbackHandlers::new().with_on_text(|delta| print!("{delta}"));
//!
//! let message = service.stream_conversation(&request, &handlers).await?;
//! assert!(message.is_end_turn());
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod llms;
pub mod message;
pub mod prelude;
pub mod prompts;
pub mod provider;
pub mod service;
pub mod stream;
pub mod tool;

pub use error::{Error, LlmError, Result};
pub use provider::ChatStreamProvider;
pub use service::{ConversationRequest, ConversationService, END_TURN, FinalMessage, create_service};
