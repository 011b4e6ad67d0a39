//! Configuration (layered: code > env > config file > defaults).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ToolchatError;
use crate::types::{GenerationSettings, DEFAULT_SEED};

/// Endpoint used when neither the config file nor the environment sets one.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;
const DEFAULT_TOOL_TIMEOUT_MS: u64 = 60_000;
const CONFIG_FILE_NAME: &str = "toolchat.toml";

/// Resolved settings for a chat session.
///
/// The API key is passed through to the provider untouched and never
/// printed by `Debug`.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolchatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub seed: u64,
    pub max_tokens: Option<u32>,
    pub request_timeout_ms: u64,
    pub tool_timeout_ms: u64,
}

impl Default for ToolchatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            seed: DEFAULT_SEED,
            max_tokens: None,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            tool_timeout_ms: DEFAULT_TOOL_TIMEOUT_MS,
        }
    }
}

impl fmt::Debug for ToolchatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolchatConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("seed", &self.seed)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("tool_timeout_ms", &self.tool_timeout_ms)
            .finish()
    }
}

impl ToolchatConfig {
    /// Defaults, then the platform config file if present, then environment.
    pub fn load() -> Result<Self, ToolchatError> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Defaults overridden by environment variables only.
    pub fn from_env() -> Result<Self, ToolchatError> {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a TOML config file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ToolchatError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            ToolchatError::Configuration(format!("{}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// `toolchat.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "toolchat")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ToolchatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup("OPENAI_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("TOOLCHAT_MODEL") {
            self.model = model;
        }
        if let Some(seed) = lookup("TOOLCHAT_SEED") {
            self.seed = parse_env("TOOLCHAT_SEED", &seed)?;
        }
        if let Some(ms) = lookup("TOOLCHAT_REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = parse_env("TOOLCHAT_REQUEST_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = lookup("TOOLCHAT_TOOL_TIMEOUT_MS") {
            self.tool_timeout_ms = parse_env("TOOLCHAT_TOOL_TIMEOUT_MS", &ms)?;
        }
        Ok(())
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Sampling settings sent with every completion request.
    pub fn generation_settings(&self) -> GenerationSettings {
        GenerationSettings::builder()
            .temperature(self.temperature)
            .seed(self.seed)
            .maybe_max_tokens(self.max_tokens)
            .build()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_millis(self.tool_timeout_ms)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ToolchatError>
where
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ToolchatError::Configuration(format!("{name}={raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_are_deterministic() {
        let config = ToolchatConfig::default();
        assert_eq!(config.generation_settings(), GenerationSettings::deterministic());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.tool_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_overrides_defaults() {
        let mut config = ToolchatConfig::default();
        config
            .apply_env_from(lookup(&[
                ("OPENAI_API_KEY", "sk-env"),
                ("OPENAI_BASE_URL", "http://localhost:5010/v1"),
                ("TOOLCHAT_MODEL", "deepseek-r1"),
                ("TOOLCHAT_TOOL_TIMEOUT_MS", "2500"),
            ]))
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.base_url, "http://localhost:5010/v1");
        assert_eq!(config.model, "deepseek-r1");
        assert_eq!(config.tool_timeout(), Duration::from_millis(2500));
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn env_rejects_non_numeric_timeouts() {
        let mut config = ToolchatConfig::default();
        let err = config
            .apply_env_from(lookup(&[("TOOLCHAT_REQUEST_TIMEOUT_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ToolchatError::Configuration(msg) if msg.contains("TOOLCHAT_REQUEST_TIMEOUT_MS")));
    }

    #[test]
    fn file_keeps_defaults_for_missing_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "model = \"gpt-4o\"\nmax_tokens = 512\n").unwrap();

        let config = ToolchatConfig::from_file(&path).unwrap();

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
        assert_eq!(config.generation_settings().max_tokens, Some(512));
    }

    #[test]
    fn file_with_bad_toml_is_a_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "model = ").unwrap();

        assert!(matches!(
            ToolchatConfig::from_file(&path),
            Err(ToolchatError::Configuration(_))
        ));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ToolchatConfig::default().with_api_key("sk-secret");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
