//! Completion provider construction from configuration

use anyhow::Result;
use memoria_core::config::ProviderConfig;
use memoria_providers::{OpenAICompatClient, ProviderRegistry};
use tracing::debug;

/// Build the completion client described by `config`
///
/// The API base comes from the config when set, otherwise from the
/// registry entry matching the provider name, the model, or the key.
pub fn build_provider(config: &ProviderConfig) -> Result<OpenAICompatClient> {
    let registry = ProviderRegistry::new();
    let spec = registry
        .find_by_name(&config.name)
        .or_else(|| registry.find_by_model(&config.model))
        .or_else(|| registry.find_by_key(&config.api_key));

    let api_base = config
        .api_base
        .clone()
        .filter(|base| !base.trim().is_empty())
        .or_else(|| spec.map(|spec| spec.default_api_base.clone()))
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown provider '{}' and no provider.api_base configured",
                config.name
            )
        })?;

    debug!(
        "Using provider {} at {}",
        spec.map(|s| s.label()).unwrap_or_else(|| config.name.clone()),
        api_base
    );

    Ok(OpenAICompatClient::new(
        Some(config.api_key.clone()),
        api_base,
        config.model.clone(),
    ))
}
