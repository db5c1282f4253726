//! Session loop: mirrors every transcript mutation into the conversation store

use console::style;
use memoria_core::config::{Config, DEFAULT_SEED_PROMPT, DEFAULT_SYSTEM_PROMPT};
use memoria_core::conversation::{ConversationEntry, ConversationStore};
use memoria_core::utils::truncate;
use memoria_providers::{LLMProvider, Message};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

use crate::input::LineSource;

/// Input that ends the session, matched case-insensitively
pub const EXIT_COMMAND: &str = "exit";

/// Parameters of a session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Model override; the provider's default when `None`
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    /// System instruction of the seed exchange
    pub system_prompt: String,
    /// Example master turn of the seed exchange
    pub seed_prompt: String,
}

impl SessionOptions {
    /// The fixed exchange written to an empty conversation
    pub fn seed_messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt.clone()),
            Message::user(self.seed_prompt.clone()),
        ]
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: 4096,
            temperature: 0.7,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            seed_prompt: DEFAULT_SEED_PROMPT.to_string(),
        }
    }
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            model: Some(config.provider.model.clone()),
            max_tokens: config.provider.max_tokens,
            temperature: config.provider.temperature,
            system_prompt: config.session.system_prompt.clone(),
            seed_prompt: config.session.seed_prompt.clone(),
        }
    }
}

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Bootstrapping,
    AwaitingInput,
    AwaitingCompletion,
    Terminated,
}

/// Result of handling one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The provider answered; the reply is already persisted
    Replied(String),
    /// The provider failed; only the master turn was persisted
    Failed(String),
    /// The exit command was entered
    Terminated,
}

/// An interactive conversation backed by a [`ConversationStore`]
pub struct Session {
    store: ConversationStore,
    provider: Arc<dyn LLMProvider>,
    options: SessionOptions,
    transcript: Vec<Message>,
    state: SessionState,
}

impl Session {
    /// Create a new session; call [`Session::bootstrap`] or [`Session::run`] next
    pub fn new(
        store: ConversationStore,
        provider: Arc<dyn LLMProvider>,
        options: SessionOptions,
    ) -> Self {
        Self {
            store,
            provider,
            options,
            transcript: Vec::new(),
            state: SessionState::Bootstrapping,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Messages replayed to the provider on every turn
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Restore the transcript from the store, seeding an empty store
    ///
    /// Returns the number of restored entries (zero when seeded).
    pub fn bootstrap(&mut self) -> memoria_core::Result<usize> {
        let log = self.store.load();

        let restored = if log.is_empty() {
            let seed = self.options.seed_messages();
            for message in &seed {
                self.store.append(ConversationEntry::from(message))?;
            }
            info!(
                "Seeded new conversation at {}",
                self.store.path().display()
            );
            self.transcript = seed;
            0
        } else {
            self.transcript = log.iter().map(Message::from).collect();
            info!(
                "Restored {} conversation entries from {}",
                log.len(),
                self.store.path().display()
            );
            log.len()
        };

        self.state = SessionState::AwaitingInput;
        Ok(restored)
    }

    /// Handle one line of operator input
    ///
    /// Store write failures are returned as errors; provider failures are
    /// reported through [`TurnOutcome::Failed`].
    pub async fn handle_line(&mut self, line: &str) -> memoria_core::Result<TurnOutcome> {
        if is_exit_command(line) {
            self.state = SessionState::Terminated;
            return Ok(TurnOutcome::Terminated);
        }

        let message = Message::user(line);
        self.store.append(ConversationEntry::from(&message))?;
        self.transcript.push(message);
        debug!("Master turn persisted: {}", truncate(line, 80));

        self.state = SessionState::AwaitingCompletion;
        let result = self
            .provider
            .chat(
                self.transcript.clone(),
                self.options.model.clone(),
                self.options.max_tokens,
                self.options.temperature,
            )
            .await;
        self.state = SessionState::AwaitingInput;

        match result {
            Ok(response) => {
                let reply = response.content_or_empty().to_string();
                let message = Message::assistant(reply.clone());
                self.store.append(ConversationEntry::from(&message))?;
                self.transcript.push(message);
                debug!(
                    "Reply persisted ({} chars, finish_reason={})",
                    reply.chars().count(),
                    response.finish_reason
                );
                Ok(TurnOutcome::Replied(reply))
            }
            Err(e) => {
                debug!("Completion failed: {}", e);
                Ok(TurnOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Drive the loop until the exit command or end of input
    pub async fn run<I, W>(&mut self, input: &mut I, out: &mut W) -> memoria_core::Result<()>
    where
        I: LineSource + ?Sized,
        W: Write,
    {
        if self.state == SessionState::Bootstrapping {
            self.bootstrap()?;
        }

        while self.state != SessionState::Terminated {
            write!(out, "{} ", style("you>").cyan().bold())?;
            out.flush()?;

            let Some(line) = input.next_line().await? else {
                writeln!(out)?;
                self.state = SessionState::Terminated;
                break;
            };

            match self.handle_line(&line).await? {
                TurnOutcome::Replied(reply) => {
                    writeln!(out, "{} {}", style("memoria>").magenta().bold(), reply)?;
                }
                TurnOutcome::Failed(reason) => {
                    writeln!(out, "{} {}", style("error:").red().bold(), reason)?;
                }
                TurnOutcome::Terminated => {}
            }
        }

        input.close().await;
        info!("Session terminated");
        Ok(())
    }
}

fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_COMMAND)
}
