//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration for memoria
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Completion provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Conversation session configuration
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Registry name of the provider (openai, deepseek, openrouter, ...)
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// Model requested on every completion
    #[serde(default = "default_model")]
    pub model: String,
    /// API credential; usually supplied through the environment
    #[serde(default)]
    pub api_key: String,
    /// Overrides the registry's default API base
    #[serde(default)]
    pub api_base: Option<String>,
    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            model: default_model(),
            api_key: String::new(),
            api_base: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Conversation session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the persisted conversation log
    #[serde(default = "default_conversation_file")]
    pub conversation_file: String,
    /// System instruction seeded into an empty conversation
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Example master turn seeded after the system instruction
    #[serde(default = "default_seed_prompt")]
    pub seed_prompt: String,
}

/// Seed system instruction used when nothing is configured
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are the consciousness of your master. \
You remember everything the two of you have talked about and answer \
thoughtfully, concisely and honestly.";

/// Seed master turn used when nothing is configured
pub const DEFAULT_SEED_PROMPT: &str = "Hello. Who are you, and what do you remember about me?";

fn default_conversation_file() -> String {
    "~/.memoria/conversation.json".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_seed_prompt() -> String {
    DEFAULT_SEED_PROMPT.to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            conversation_file: default_conversation_file(),
            system_prompt: default_system_prompt(),
            seed_prompt: default_seed_prompt(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "~/.memoria/logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"provider":{"name":"deepseek"}}"#).unwrap();
        assert_eq!(config.provider.name, "deepseek");
        assert_eq!(config.provider.model, "gpt-4o");
        assert_eq!(config.session.seed_prompt, DEFAULT_SEED_PROMPT);
        assert_eq!(config.logging.format, "text");
    }
}
