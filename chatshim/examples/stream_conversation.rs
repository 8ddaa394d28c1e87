//! Stream one conversation turn through the legacy service interface.
//!
//! Reads `chatshim.toml` and `prompts/prompts.json` from the working
//! directory when present.
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! RUST_LOG=chatshim=debug cargo run --example stream_conversation -- "Write a haiku about Rust."
//! ```

#![allow(clippy::print_stdout)]

use std::io::{Write, stdout};

use chatshim::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Write a haiku about Rust.".to_owned());

    let service = create_service(None)?;
    let mut messages = vec![Message::user(prompt)];

    let handlers = CallbackHandlers::new().with_on_text(|delta| {
        print!("{delta}");
        let _ = stdout().flush();
    });

    // Keep streaming until the service reports the end of the turn.
    loop {
        let request = ConversationRequest::new(messages.clone());
        let message = service.stream_conversation(&request, &handlers).await?;
        messages.push(Message::assistant(message.content.clone()));
        if message.is_end_turn() {
            break;
        }
    }
    println!();

    Ok(())
}
