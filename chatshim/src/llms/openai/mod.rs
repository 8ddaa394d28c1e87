//! OpenAI API client implementation.
//!
//! Streaming chat completions against `/chat/completions`, usable with any
//! OpenAI-compatible server via [`OpenAIConfig::with_base_url`].

mod chat;
mod client;
mod config;
mod stream;
mod types;

pub use client::OpenAI;
pub use config::{API_KEY_ENV, OpenAIConfig};
