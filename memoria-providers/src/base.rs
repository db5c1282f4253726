//! Base trait for completion providers

use async_trait::async_trait;
use memoria_core::conversation::{ApiRole, ConversationEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Error type for provider operations
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("API error: {0}")]
    ApiError(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Response from a completion provider
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Assistant text; absent when the model returned none
    pub content: Option<String>,
    pub finish_reason: String,
    pub usage: HashMap<String, i64>,
}

fn default_finish_reason() -> String {
    "stop".to_string()
}

impl LLMResponse {
    /// Create a plain text response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: default_finish_reason(),
            usage: HashMap::new(),
        }
    }

    /// Reply text, with absent content read as empty
    pub fn content_or_empty(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

/// A message in the chat conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: ApiRole,
    pub content: String,
}

impl Message {
    pub fn new(role: ApiRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ApiRole::User, content)
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ApiRole::System, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ApiRole::Assistant, content)
    }
}

impl From<&ConversationEntry> for Message {
    fn from(entry: &ConversationEntry) -> Self {
        Self::new(entry.api_role(), entry.content.clone())
    }
}

impl From<&Message> for ConversationEntry {
    fn from(message: &Message) -> Self {
        ConversationEntry::from_api(message.role, message.content.clone())
    }
}

/// Trait for completion providers
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Request exactly one non-streaming completion for `messages`
    async fn chat(
        &self,
        messages: Vec<Message>,
        model: Option<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> ProviderResult<LLMResponse>;
}
