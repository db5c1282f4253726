//! Provider registry - single source of truth for endpoint metadata

use serde::{Deserialize, Serialize};
use tracing::error;

/// One completion provider's metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSpec {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    /// Substrings of model names served by this provider
    #[serde(default)]
    pub keywords: Vec<String>,
    pub default_api_base: String,
    /// API keys starting with this prefix belong to this provider
    #[serde(default)]
    pub detect_by_key_prefix: String,
}

impl ProviderSpec {
    pub fn label(&self) -> String {
        if !self.display_name.is_empty() {
            self.display_name.clone()
        } else {
            let mut name = self.name.clone();
            if let Some(first_char) = name.chars().next() {
                name = first_char.to_uppercase().to_string() + &name[first_char.len_utf8()..];
            }
            name
        }
    }
}

/// Registry of known OpenAI-compatible providers
pub struct ProviderRegistry {
    providers: Vec<ProviderSpec>,
}

impl ProviderRegistry {
    /// Create a new provider registry with default providers
    pub fn new() -> Self {
        Self {
            providers: Self::default_providers(),
        }
    }

    /// Get all provider specs
    pub fn all(&self) -> &[ProviderSpec] {
        &self.providers
    }

    /// Find a provider by config name (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Option<&ProviderSpec> {
        self.providers
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
    }

    /// Find a provider by model name (case-insensitive keyword matching)
    pub fn find_by_model(&self, model: &str) -> Option<&ProviderSpec> {
        let model_lower = model.to_lowercase();
        self.providers
            .iter()
            .find(|spec| spec.keywords.iter().any(|kw| model_lower.contains(kw.as_str())))
    }

    /// Find a provider by the prefix of its API key
    pub fn find_by_key(&self, api_key: &str) -> Option<&ProviderSpec> {
        self.providers.iter().find(|spec| {
            !spec.detect_by_key_prefix.is_empty() && api_key.starts_with(&spec.detect_by_key_prefix)
        })
    }

    fn default_providers() -> Vec<ProviderSpec> {
        let yaml = include_str!("providers.yaml");
        serde_yaml::from_str(yaml).unwrap_or_else(|e| {
            error!("Failed to parse default providers configuration: {}", e);
            Vec::new()
        })
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
