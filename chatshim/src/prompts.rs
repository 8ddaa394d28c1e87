//! System prompt table.
//!
//! Prompts are keyed by *prompt type* and loaded once from a JSON file:
//!
//! ```json
//! {
//!   "systemPrompts": {
//!     "standardAssistant": { "content": "You are a helpful assistant." },
//!     "terse": { "content": "Answer in one sentence." }
//!   }
//! }
//! ```
//!
//! Lookups are total: an unknown type falls back to the configured default
//! type, and a missing default falls back to [`FALLBACK_SYSTEM_PROMPT`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Environment variable naming the prompt file.
pub const PROMPTS_PATH_ENV: &str = "CHATSHIM_PROMPTS";
/// Prompt file used when [`PROMPTS_PATH_ENV`] is unset.
pub const DEFAULT_PROMPTS_PATH: &str = "prompts/prompts.json";

/// Returned when neither the requested nor the default prompt type resolves.
pub const FALLBACK_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// One entry of the prompt table. Extra fields in the file are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptEntry {
    /// The system instruction text.
    #[serde(default)]
    pub content: String,
}

/// Immutable mapping from prompt type to system prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTable {
    #[serde(rename = "systemPrompts", default)]
    prompts: HashMap<String, PromptEntry>,
}

impl PromptTable {
    /// Creates an empty table; every lookup resolves to the fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a table from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the document is malformed.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a table from a JSON file. A missing file yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "prompt file not found, using fallback prompt only");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let table = Self::from_json_str(&content)?;
        debug!(path = %path.display(), prompts = table.len(), "loaded prompt table");

        Ok(table)
    }

    /// Load the table from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt file exists but is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(prompts_path())
    }

    /// Adds or replaces an entry.
    #[must_use]
    pub fn with_prompt(mut self, prompt_type: impl Into<String>, content: impl Into<String>) -> Self {
        self.prompts.insert(
            prompt_type.into(),
            PromptEntry {
                content: content.into(),
            },
        );
        self
    }

    /// Returns the content for `prompt_type`, if present and non-empty.
    #[must_use]
    pub fn get(&self, prompt_type: &str) -> Option<&str> {
        self.prompts
            .get(prompt_type)
            .map(|entry| entry.content.as_str())
            .filter(|content| !content.is_empty())
    }

    /// Resolves a system prompt: requested type, then `default_type`, then
    /// [`FALLBACK_SYSTEM_PROMPT`].
    #[must_use]
    pub fn resolve<'a>(&'a self, prompt_type: &str, default_type: &str) -> &'a str {
        self.get(prompt_type)
            .or_else(|| self.get(default_type))
            .unwrap_or(FALLBACK_SYSTEM_PROMPT)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

/// Path of the prompt file, honoring [`PROMPTS_PATH_ENV`].
#[must_use]
pub fn prompts_path() -> PathBuf {
    std::env::var_os(PROMPTS_PATH_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_PROMPTS_PATH), PathBuf::from)
}
