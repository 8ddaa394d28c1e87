//! Tool types accepted by the conversation interface.
//!
//! Tool calling is not wired to the provider yet. [`ToolDefinition`]s are
//! accepted on requests so callers written against the legacy interface keep
//! compiling, and [`ToolUse`] is the payload reserved for
//! [`ConversationHandlers::on_tool_use`](crate::handlers::ConversationHandlers::on_tool_use).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of a tool the model may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool (e.g., "get_weather").
    pub name: String,

    /// Description of what the tool does.
    #[serde(default)]
    pub description: String,

    /// JSON schema for the tool's parameters.
    #[serde(default, alias = "input_schema")]
    pub parameters: Value,
}

impl ToolDefinition {
    /// Create a new tool definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    /// Provider-assigned call id.
    pub id: String,
    /// Name of the tool to call.
    pub name: String,
    /// Parsed arguments.
    pub input: Value,
}
