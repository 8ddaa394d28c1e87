//! Conversation service behavior against a scripted provider.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chatshim::prelude::*;
use serde_json::json;

/// One scripted stream item.
type Scripted = std::result::Result<StreamChunk, LlmError>;

/// What the scripted provider does when called.
#[derive(Debug, Clone)]
enum Script {
    /// Reject the call before streaming.
    Reject(LlmError),
    /// Stream these items in order.
    Stream(Vec<Scripted>),
}

/// A provider that records every request and replays a script.
#[derive(Debug)]
struct ScriptedProvider {
    script: Script,
    captured: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn streaming(items: Vec<Scripted>) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Stream(items),
            captured: Mutex::new(Vec::new()),
        })
    }

    fn text(fragments: &[&str]) -> Arc<Self> {
        Self::streaming(fragments.iter().map(|f| Ok(StreamChunk::text(*f))).collect())
    }

    fn rejecting(error: LlmError) -> Arc<Self> {
        Arc::new(Self {
            script: Script::Reject(error),
            captured: Mutex::new(Vec::new()),
        })
    }

    fn last_request(&self) -> ChatRequest {
        self.captured.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl ChatStreamProvider for ScriptedProvider {
    async fn chat_stream(&self, request: &ChatRequest) -> chatshim::Result<ChunkStream> {
        self.captured.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Reject(error) => Err(error.clone().into()),
            Script::Stream(items) => {
                let items = items.clone();
                Ok(Box::pin(async_stream::stream! {
                    for item in items {
                        tokio::task::yield_now().await;
                        yield item.map_err(Error::from);
                    }
                }))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Handlers that record every callback.
#[derive(Debug, Default)]
struct Recorder {
    texts: Mutex<Vec<String>>,
    messages: Mutex<Vec<FinalMessage>>,
}

#[async_trait]
impl ConversationHandlers for Recorder {
    async fn on_text(&self, delta: &str) {
        self.texts.lock().unwrap().push(delta.to_owned());
    }

    async fn on_message(&self, message: &FinalMessage) {
        self.messages.lock().unwrap().push(message.clone());
    }
}

fn prompts() -> PromptTable {
    PromptTable::from_json_str(
        r#"{"systemPrompts": {
            "standardAssistant": {"content": "You help store owners."},
            "concise": {"content": "Be brief."}
        }}"#,
    )
    .unwrap()
}

fn service(provider: Arc<ScriptedProvider>) -> ConversationService<Arc<ScriptedProvider>> {
    ConversationService::new(provider, Arc::new(AppConfig::default()), Arc::new(prompts()))
}

#[tokio::test]
async fn fragments_are_forwarded_in_order_and_assembled() {
    let provider = ScriptedProvider::text(&["Hel", "lo"]);
    let svc = service(Arc::clone(&provider));
    let recorder = Recorder::default();

    let request = ConversationRequest::new(vec![Message::user("hi")]);
    let message = svc.stream_conversation(&request, &recorder).await.unwrap();

    assert_eq!(*recorder.texts.lock().unwrap(), vec!["Hel", "lo"]);
    assert_eq!(message.content, "Hello");
    assert_eq!(message.role, Role::Assistant);
    assert_eq!(message.stop_reason, END_TURN);
    assert!(message.is_end_turn());
    assert_eq!(*recorder.messages.lock().unwrap(), vec![message]);
}

#[tokio::test]
async fn empty_stream_still_completes_the_turn() {
    let provider = ScriptedProvider::text(&[]);
    let svc = service(provider);
    let recorder = Recorder::default();

    let message = svc
        .stream_conversation(&ConversationRequest::new(vec![Message::user("hi")]), &recorder)
        .await
        .unwrap();

    assert_eq!(message.content, "");
    assert_eq!(message.stop_reason, END_TURN);
    assert!(recorder.texts.lock().unwrap().is_empty());
    assert_eq!(recorder.messages.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn non_text_and_empty_chunks_are_not_forwarded() {
    let provider = ScriptedProvider::streaming(vec![
        Ok(StreamChunk::text("")),
        Ok(StreamChunk::text("a")),
        Ok(StreamChunk::done(Some("stop".into()))),
        Ok(StreamChunk::done(None)),
    ]);
    let svc = service(provider);
    let recorder = Recorder::default();

    let message = svc
        .stream_conversation(&ConversationRequest::default(), &recorder)
        .await
        .unwrap();

    assert_eq!(*recorder.texts.lock().unwrap(), vec!["a"]);
    assert_eq!(message.content, "a");
}

#[tokio::test]
async fn rejected_call_propagates_and_skips_on_message() {
    let error = LlmError::auth("openai", "invalid key");
    let provider = ScriptedProvider::rejecting(error.clone());
    let svc = service(provider);
    let recorder = Recorder::default();

    let err = svc
        .stream_conversation(&ConversationRequest::new(vec![Message::user("hi")]), &recorder)
        .await
        .unwrap_err();

    assert_eq!(err.as_llm(), Some(&error));
    assert!(recorder.texts.lock().unwrap().is_empty());
    assert!(recorder.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn mid_stream_failure_keeps_delivered_fragments() {
    let error = LlmError::stream("connection reset");
    let provider = ScriptedProvider::streaming(vec![
        Ok(StreamChunk::text("partial")),
        Err(error.clone()),
        Ok(StreamChunk::text("never")),
    ]);
    let svc = service(provider);
    let recorder = Recorder::default();

    let err = svc
        .stream_conversation(&ConversationRequest::default(), &recorder)
        .await
        .unwrap_err();

    assert_eq!(err.as_llm(), Some(&error));
    assert_eq!(*recorder.texts.lock().unwrap(), vec!["partial"]);
    assert!(recorder.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn structured_content_is_sent_as_string() {
    let provider = ScriptedProvider::text(&["ok"]);
    let svc = service(Arc::clone(&provider));

    let request = ConversationRequest::new(vec![
        Message::user("plain"),
        Message::assistant(json!([{"text": "stored as json"}])),
        Message::user(json!({"count": 3})),
    ]);
    svc.stream_conversation(&request, &NoopHandlers).await.unwrap();

    let sent = provider.last_request();
    let contents: Vec<&str> = sent
        .messages
        .iter()
        .map(|m| m.content.as_text().unwrap())
        .collect();
    assert_eq!(
        contents,
        vec![
            "You help store owners.",
            "plain",
            r#"[{"text":"stored as json"}]"#,
            r#"{"count":3}"#,
        ]
    );
    assert_eq!(sent.messages[2].role, Role::Assistant);
}

#[tokio::test]
async fn system_prompt_follows_prompt_type_with_fallbacks() {
    let provider = ScriptedProvider::text(&[]);
    let svc = service(Arc::clone(&provider));

    let request = ConversationRequest::new(vec![Message::user("hi")]).prompt_type("concise");
    svc.stream_conversation(&request, &NoopHandlers).await.unwrap();
    assert_eq!(provider.last_request().messages[0], Message::system("Be brief."));

    let request = ConversationRequest::new(vec![Message::user("hi")]).prompt_type("unknown");
    svc.stream_conversation(&request, &NoopHandlers).await.unwrap();
    assert_eq!(
        provider.last_request().messages[0],
        Message::system("You help store owners.")
    );

    assert_eq!(svc.system_prompt("concise"), "Be brief.");
    assert_eq!(svc.system_prompt("unknown"), "You help store owners.");
}

#[tokio::test]
async fn generic_fallback_when_default_type_is_missing() {
    let provider = ScriptedProvider::text(&[]);
    let svc = ConversationService::new(
        Arc::clone(&provider),
        Arc::new(AppConfig::default()),
        Arc::new(PromptTable::new()),
    );

    svc.stream_conversation(&ConversationRequest::default(), &NoopHandlers)
        .await
        .unwrap();

    assert_eq!(svc.system_prompt("anything"), FALLBACK_SYSTEM_PROMPT);
    assert_eq!(
        provider.last_request().messages,
        vec![Message::system(FALLBACK_SYSTEM_PROMPT)]
    );
}

#[tokio::test]
async fn model_parameters_come_from_config() {
    let provider = ScriptedProvider::text(&[]);
    let config = AppConfig::from_toml_str("[api]\ndefault_model = \"gpt-4.1-mini\"\nmax_tokens = 300\n")
        .unwrap();
    let svc = ConversationService::new(Arc::clone(&provider), Arc::new(config), Arc::new(prompts()));

    let request = ConversationRequest::new(vec![Message::user("hi")])
        .tools(vec![ToolDefinition::new("lookup", "Find a thing", json!({"type": "object"}))]);
    svc.stream_conversation(&request, &NoopHandlers).await.unwrap();

    let sent = provider.last_request();
    assert_eq!(sent.model, "gpt-4.1-mini");
    assert_eq!(sent.max_tokens, Some(300));
    assert_eq!(sent.messages.len(), 2);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let provider = ScriptedProvider::text(&["x", "y"]);
    let svc = Arc::new(service(provider));

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                let recorder = Recorder::default();
                let message = svc
                    .stream_conversation(&ConversationRequest::default(), &recorder)
                    .await
                    .unwrap();
                (message, recorder.texts.into_inner().unwrap())
            })
        })
        .collect();

    for task in tasks {
        let (message, texts) = task.await.unwrap();
        assert_eq!(message.content, "xy");
        assert_eq!(texts, vec!["x", "y"]);
    }
}

#[tokio::test]
async fn closure_handlers_work_end_to_end() {
    let provider = ScriptedProvider::text(&["a", "b", "c"]);
    let svc = service(provider);

    let collected = Arc::new(Mutex::new(String::new()));
    let sink = Arc::clone(&collected);
    let done = Arc::new(Mutex::new(None::<String>));
    let done_sink = Arc::clone(&done);

    let handlers = CallbackHandlers::new()
        .with_on_text(move |d| sink.lock().unwrap().push_str(d))
        .with_on_message(move |m| *done_sink.lock().unwrap() = Some(m.stop_reason.clone()));

    svc.stream_conversation(&ConversationRequest::default(), &handlers)
        .await
        .unwrap();

    assert_eq!(*collected.lock().unwrap(), "abc");
    assert_eq!(done.lock().unwrap().as_deref(), Some(END_TURN));
}
