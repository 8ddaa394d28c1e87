//! OpenAI SSE stream parsing.

use std::fmt::Display;

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};

use crate::error::{LlmError, Result};
use crate::stream::{ChunkStream, StreamChunk};

use super::types::OpenAIStreamChunk;

/// Sentinel payload that terminates an OpenAI stream.
const DONE_MARKER: &str = "[DONE]";

/// Turn a raw response body into a stream of chunks.
///
/// Event framing is handled by `eventsource-stream`, so events split across
/// network reads are reassembled before parsing.
pub(crate) fn sse_chunks<S, B, E>(body: S) -> ChunkStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let parsed = body.eventsource().flat_map(|event| {
        let chunks = match event {
            Ok(event) => parse_event_data(&event.data),
            Err(e) => vec![Err(LlmError::stream(e.to_string()).into())],
        };
        futures::stream::iter(chunks)
    });

    Box::pin(parsed)
}

/// Parse the `data` payload of one SSE event.
pub(crate) fn parse_event_data(data: &str) -> Vec<Result<StreamChunk>> {
    let data = data.trim();
    if data.is_empty() {
        return Vec::new();
    }

    if data == DONE_MARKER {
        return vec![Ok(StreamChunk::done(None))];
    }

    match serde_json::from_str::<OpenAIStreamChunk>(data) {
        Ok(chunk) => convert_chunk(chunk),
        Err(e) => {
            tracing::warn!(error = %e, data, "undecodable stream event");
            vec![Err(LlmError::stream(format!("invalid stream event: {e}")).into())]
        }
    }
}

/// Convert an OpenAI stream chunk to our format. Only the first choice is read.
fn convert_chunk(chunk: OpenAIStreamChunk) -> Vec<Result<StreamChunk>> {
    if let Some(error) = chunk.error {
        return vec![Err(error.into_llm_error(|| "stream_error".to_owned()).into())];
    }

    let mut results = Vec::new();

    if let Some(choice) = chunk.choices.into_iter().next() {
        if let Some(content) = choice.delta.content
            && !content.is_empty()
        {
            results.push(Ok(StreamChunk::text(content)));
        }

        if let Some(reason) = choice.finish_reason {
            results.push(Ok(StreamChunk::done(Some(reason))));
        }
    }

    results
}
