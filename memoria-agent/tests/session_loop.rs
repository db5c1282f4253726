use async_trait::async_trait;
use memoria_agent::{LineSource, ReaderLines, Session, SessionOptions, SessionState};
use memoria_core::conversation::{ApiRole, ConversationEntry, ConversationStore, StoreRole};
use memoria_providers::{LLMProvider, LLMResponse, Message, ProviderError, ProviderResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Replays a fixed script, then reports end of input
struct ScriptedLines {
    lines: VecDeque<String>,
    closed: bool,
}

impl ScriptedLines {
    fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            closed: false,
        }
    }
}

#[async_trait]
impl LineSource for ScriptedLines {
    async fn next_line(&mut self) -> std::io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

/// Echoes the last user message and records every request
#[derive(Default)]
struct EchoProvider {
    requests: Mutex<Vec<Vec<Message>>>,
}

#[async_trait]
impl LLMProvider for EchoProvider {
    async fn chat(
        &self,
        messages: Vec<Message>,
        _model: Option<String>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> ProviderResult<LLMResponse> {
        let last = messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.requests.lock().unwrap().push(messages);
        Ok(LLMResponse::text(format!("echo: {}", last)))
    }
}

struct FailingProvider;

#[async_trait]
impl LLMProvider for FailingProvider {
    async fn chat(
        &self,
        _messages: Vec<Message>,
        _model: Option<String>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> ProviderResult<LLMResponse> {
        Err(ProviderError::ApiError("HTTP 503: unavailable".to_string()))
    }
}

struct SilentProvider;

#[async_trait]
impl LLMProvider for SilentProvider {
    async fn chat(
        &self,
        _messages: Vec<Message>,
        _model: Option<String>,
        _max_tokens: u32,
        _temperature: f32,
    ) -> ProviderResult<LLMResponse> {
        Ok(LLMResponse {
            content: None,
            finish_reason: "stop".to_string(),
            usage: Default::default(),
        })
    }
}

fn store_in(dir: &TempDir) -> ConversationStore {
    ConversationStore::new(dir.path().join("conversation.json"))
}

async fn run_script(
    store: ConversationStore,
    provider: Arc<dyn LLMProvider>,
    script: &[&str],
) -> (Session, ScriptedLines, String) {
    let mut session = Session::new(store, provider, SessionOptions::default());
    let mut input = ScriptedLines::new(script);
    let mut out = Vec::new();
    session.run(&mut input, &mut out).await.unwrap();
    (session, input, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_first_run_seeds_then_chats_until_exit() {
    let temp_dir = TempDir::new().unwrap();
    let provider = Arc::new(EchoProvider::default());

    let (session, input, output) =
        run_script(store_in(&temp_dir), provider.clone(), &["hello", "exit", "never read"]).await;

    assert_eq!(session.state(), SessionState::Terminated);
    assert!(input.closed);
    assert_eq!(input.lines.len(), 1);
    assert!(output.contains("echo: hello"));

    let roles: Vec<StoreRole> = store_in(&temp_dir).load().iter().map(|e| e.role).collect();
    assert_eq!(
        roles,
        vec![
            StoreRole::System,
            StoreRole::Master,
            StoreRole::Master,
            StoreRole::Consciousness
        ]
    );

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let sent_roles: Vec<ApiRole> = requests[0].iter().map(|m| m.role).collect();
    assert_eq!(sent_roles, vec![ApiRole::System, ApiRole::User, ApiRole::User]);
}

#[tokio::test]
async fn test_uppercase_exit_performs_no_call() {
    let temp_dir = TempDir::new().unwrap();
    let provider = Arc::new(EchoProvider::default());

    let (_, _, _) = run_script(store_in(&temp_dir), provider.clone(), &["EXIT"]).await;

    assert!(provider.requests.lock().unwrap().is_empty());
    assert_eq!(store_in(&temp_dir).len(), 2);
}

#[tokio::test]
async fn test_end_of_input_terminates() {
    let temp_dir = TempDir::new().unwrap();
    let (session, input, _) =
        run_script(store_in(&temp_dir), Arc::new(EchoProvider::default()), &[]).await;

    assert_eq!(session.state(), SessionState::Terminated);
    assert!(input.closed);
}

#[tokio::test]
async fn test_failing_provider_keeps_loop_alive() {
    let temp_dir = TempDir::new().unwrap();

    let (session, _, output) = run_script(
        store_in(&temp_dir),
        Arc::new(FailingProvider),
        &["first", "second", "exit"],
    )
    .await;

    assert_eq!(output.matches("HTTP 503").count(), 2);
    assert_eq!(session.state(), SessionState::Terminated);

    let log = store_in(&temp_dir).load();
    assert_eq!(log.len(), 4);
    assert!(log.iter().all(|e| e.role != StoreRole::Consciousness));
    assert_eq!(log.last(), Some(&ConversationEntry::master("second")));
}

#[tokio::test]
async fn test_absent_reply_is_persisted_as_empty() {
    let temp_dir = TempDir::new().unwrap();

    run_script(store_in(&temp_dir), Arc::new(SilentProvider), &["anyone?"]).await;

    let log = store_in(&temp_dir).load();
    assert_eq!(log.last(), Some(&ConversationEntry::consciousness("")));
}

#[tokio::test]
async fn test_second_run_replays_history() {
    let temp_dir = TempDir::new().unwrap();
    run_script(
        store_in(&temp_dir),
        Arc::new(EchoProvider::default()),
        &["remember the number 7", "exit"],
    )
    .await;

    let provider = Arc::new(EchoProvider::default());
    run_script(store_in(&temp_dir), provider.clone(), &["what number?", "exit"]).await;

    let requests = provider.requests.lock().unwrap();
    let contents: Vec<&str> = requests[0].iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents.len(), 5);
    assert_eq!(contents[2], "remember the number 7");
    assert_eq!(contents[3], "echo: remember the number 7");
    assert_eq!(contents[4], "what number?");
    assert_eq!(store_in(&temp_dir).len(), 6);
}

#[tokio::test]
async fn test_corrupt_log_starts_fresh_conversation() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_in(&temp_dir);
    std::fs::write(store.path(), "<<garbage>>").unwrap();

    let mut session = Session::new(store, Arc::new(EchoProvider::default()), SessionOptions::default());
    assert_eq!(session.bootstrap().unwrap(), 0);
    assert_eq!(session.transcript().len(), 2);
    assert_eq!(store_in(&temp_dir).try_load().unwrap().len(), 2);
}

#[tokio::test]
async fn test_raw_operator_bytes_reach_the_log() {
    let temp_dir = TempDir::new().unwrap();
    let provider = Arc::new(EchoProvider::default());
    let mut session = Session::new(store_in(&temp_dir), provider.clone(), SessionOptions::default());
    let mut input = ReaderLines::new(&b"caf\xe9\r\nEXIT\r\n"[..]);
    let mut out = Vec::new();

    session.run(&mut input, &mut out).await.unwrap();

    assert_eq!(session.state(), SessionState::Terminated);
    assert_eq!(provider.requests.lock().unwrap().len(), 1);

    let log = store_in(&temp_dir).load();
    assert_eq!(log.len(), 4);
    assert_eq!(log[2], ConversationEntry::master("caf\u{FFFD}"));
    assert_eq!(log[3], ConversationEntry::consciousness("echo: caf\u{FFFD}"));
}
