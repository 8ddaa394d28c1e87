//! Streaming response types.
//!
//! A provider turns its wire format into a sequence of [`StreamChunk`]s. The
//! conversation service only consumes text; the other variants exist so a
//! provider can report how the stream ended.

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A boxed, sendable stream of chunks as returned by providers.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// A chunk of a streaming chat-completion response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StreamChunk {
    /// Incremental text content.
    Text {
        /// The text delta.
        text: String,
    },

    /// The provider reported the end of generation.
    Done {
        /// Raw finish reason from the provider (`stop`, `length`, ...).
        #[serde(skip_serializing_if = "Option::is_none")]
        finish_reason: Option<String>,
    },
}

impl StreamChunk {
    /// Creates a text chunk.
    #[inline]
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            text: content.into(),
        }
    }

    /// Creates a done chunk.
    #[must_use]
    pub const fn done(finish_reason: Option<String>) -> Self {
        Self::Done { finish_reason }
    }

    /// Returns the text content if this is a text chunk.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Done { .. } => None,
        }
    }

    /// Returns `true` if this is a done chunk.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done { .. })
    }
}
