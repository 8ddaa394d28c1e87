//! OpenAI [`ChatStreamProvider`] implementation.

use async_trait::async_trait;

use crate::error::Result;
use crate::provider::{ChatRequest, ChatStreamProvider};
use crate::stream::ChunkStream;

use super::client::OpenAI;
use super::stream::sse_chunks;

#[async_trait]
impl ChatStreamProvider for OpenAI {
    async fn chat_stream(&self, request: &ChatRequest) -> Result<ChunkStream> {
        let url = self.chat_url();
        let body = Self::build_body(request)?;

        tracing::debug!(
            model = %body.model,
            messages = body.messages.len(),
            max_tokens = ?body.max_tokens,
            "sending streaming chat completion"
        );

        let response = self.build_request(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Self::parse_error(status.as_u16(), &error_text).into());
        }

        Ok(sse_chunks(response.bytes_stream()))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
