//! Configuration loading and management

use super::schema::Config;
use super::validate::validate_config;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Prefix of path-style environment overrides (`MEMORIA__PROVIDER__MODEL`)
const ENV_PREFIX: &str = "MEMORIA__";

/// Provider name to the conventional environment variable carrying its key
const PROVIDER_KEY_ALIASES: &[(&str, &str)] = &[
    ("openai", "OPENAI_API_KEY"),
    ("deepseek", "DEEPSEEK_API_KEY"),
    ("openrouter", "OPENROUTER_API_KEY"),
    ("groq", "GROQ_API_KEY"),
    ("moonshot", "MOONSHOT_API_KEY"),
    ("dashscope", "DASHSCOPE_API_KEY"),
];

/// Configuration loader
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Create a new config loader with the default config directory
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .map(|h| h.join(".memoria"))
            .unwrap_or_else(|| PathBuf::from(".memoria"));

        Self { config_dir }
    }

    /// Create a new config loader with a custom config directory
    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            config_dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Load configuration from file and environment
    ///
    /// Precedence, lowest first: defaults, `config.json`, the provider's
    /// conventional key variable, `MEMORIA__*` path overrides.
    pub fn load(&self) -> crate::Result<Config> {
        let config_path = self.config_path();
        let mut merged = serde_json::to_value(Config::default())?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let file_value: Value = serde_json::from_str(&content).map_err(|e| {
                crate::Error::Config(format!("{}: {}", config_path.display(), e))
            })?;
            merge_values(&mut merged, file_value);
        }

        apply_alias_overrides(&mut merged);
        apply_path_overrides(&mut merged);

        let config: Config = serde_json::from_value(merged)?;
        validate_config(&config)?;
        Ok(config)
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(existing) = base_map.get_mut(&key) {
                    merge_values(existing, value);
                } else {
                    base_map.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

/// Reads an override in the shape of the value it replaces
///
/// Text settings, unset ones included, take the raw string verbatim so a
/// key like `123456` or a model named `null` stays a string.
fn coerce_env_value(current: Option<&Value>, raw: &str) -> Value {
    match current {
        Some(Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_)) => {
            parse_env_value(raw)
        }
        _ => Value::String(raw.to_string()),
    }
}

fn parse_env_value(raw: &str) -> Value {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        return v;
    }
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    Value::String(raw.to_string())
}

fn set_path_value(root: &mut Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut current = root;
    for segment in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let Some(map) = current.as_object_mut() else {
            return;
        };
        current = map
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Some(map) = current.as_object_mut() {
        map.insert(last.clone(), value);
    }
}

/// Picks up the conventional key variable of the selected provider
fn apply_alias_overrides(config: &mut Value) {
    let name_override = std::env::var(format!("{}PROVIDER__NAME", ENV_PREFIX)).ok();
    let provider_name = name_override.or_else(|| {
        config
            .pointer("/provider/name")
            .and_then(Value::as_str)
            .map(ToString::to_string)
    });
    let Some(provider_name) = provider_name else {
        return;
    };

    let env_key = PROVIDER_KEY_ALIASES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&provider_name))
        .map(|(_, key)| *key);

    if let Some(value) = env_key.and_then(|key| std::env::var(key).ok()) {
        let path = vec!["provider".to_string(), "api_key".to_string()];
        set_path_value(config, &path, Value::String(value));
    }
}

fn apply_path_overrides(config: &mut Value) {
    for (key, value) in std::env::vars() {
        let Some(suffix) = key.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let segments: Vec<String> = suffix
            .split("__")
            .filter(|s| !s.is_empty())
            .map(|s| s.to_ascii_lowercase())
            .collect();
        if segments.is_empty() {
            continue;
        }
        let pointer = format!("/{}", segments.join("/"));
        let value = coerce_env_value(config.pointer(&pointer), &value);
        set_path_value(config, &segments, value);
    }
}
