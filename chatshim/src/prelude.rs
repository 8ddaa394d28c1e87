//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use chatshim::prelude::*;
//! ```

pub use crate::config::{ApiConfig, AppConfig};
pub use crate::error::{Error, LlmError, Result};
pub use crate::handlers::{
    CallbackHandlers, ConversationHandlers, LoggingHandlers, NoopHandlers,
    SharedConversationHandlers,
};
pub use crate::llms::{OpenAI, OpenAIConfig};
pub use crate::message::{Message, MessageContent, Role};
pub use crate::prompts::{FALLBACK_SYSTEM_PROMPT, PromptTable};
pub use crate::provider::{ChatRequest, ChatStreamProvider};
pub use crate::service::{
    ConversationRequest, ConversationService, END_TURN, FinalMessage, create_service,
};
pub use crate::stream::{ChunkStream, StreamChunk};
pub use crate::tool::{ToolDefinition, ToolUse};
