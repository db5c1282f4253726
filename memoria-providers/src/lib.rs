//! Completion provider integrations for memoria
//!
//! This crate provides the provider abstraction and an OpenAI-compatible
//! chat completions client.

pub mod base;
pub mod openai;
pub mod registry;

pub use base::{LLMProvider, LLMResponse, Message, ProviderError, ProviderResult};
pub use openai::OpenAICompatClient;
pub use registry::{ProviderRegistry, ProviderSpec};
