//! Server configuration
//!
//! Loaded from the TOML file named by `HEARTH_CONFIG` (default `hearth.toml`).
//! A missing file yields the defaults; secrets stay in the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use hearth::ConfigEntry;
use hearth_google::GoogleConfig;

pub const CONFIG_ENV: &str = "HEARTH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "hearth.toml";
pub const DEFAULT_ENTRY_TITLE: &str = "Google Generative AI Conversation";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Name of the home, rendered into prompts
    pub location_name: String,
    /// Language of turns that do not name one
    pub language: String,
    /// JSON seed file for the area/device registry
    pub registry_path: Option<PathBuf>,
    /// Agent used when a request does not name one
    pub default_agent: Option<String>,
    pub entries: Vec<ConfigEntry>,
    pub google: GoogleSettings,
}

/// Overrides for the Google Generative AI endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    pub base_url: Option<String>,
    pub api_version: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl GoogleSettings {
    /// Apply the overrides on top of a client configuration
    pub fn apply(&self, mut config: GoogleConfig) -> GoogleConfig {
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(api_version) = &self.api_version {
            config = config.with_api_version(api_version.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config = config.with_timeout_secs(timeout_secs);
        }
        config
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            location_name: "Home".to_string(),
            language: "en".to_string(),
            registry_path: None,
            default_agent: None,
            entries: vec![ConfigEntry::new(DEFAULT_ENTRY_TITLE)],
            google: GoogleSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load from `HEARTH_CONFIG` or `hearth.toml`
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        if config.entries.is_empty() {
            anyhow::bail!("At least one [[entries]] table is required");
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.location_name, "Home");
        assert_eq!(config.language, "en");
        assert_eq!(config.entries.len(), 1);
        assert_eq!(config.entries[0].title, DEFAULT_ENTRY_TITLE);
        assert_eq!(config.entries[0].options.chat_model, "models/gemini-pro");
    }

    #[test]
    fn test_parse_entries_and_overrides() {
        let config = ServerConfig::parse(
            r#"
            bind = "127.0.0.1:9000"
            location_name = "Cabin"
            default_agent = "conversation.kitchen"

            [google]
            base_url = "http://localhost:1234/"
            timeout_secs = 5

            [[entries]]
            entry_id = "kitchen"
            title = "Kitchen"

            [entries.options]
            temperature = 0.2
            max_tokens = 64
            "#,
        )
        .unwrap();

        assert_eq!(config.bind, "127.0.0.1:9000");
        assert_eq!(config.location_name, "Cabin");
        assert_eq!(config.language, "en");
        assert_eq!(config.default_agent.as_deref(), Some("conversation.kitchen"));

        let entry = &config.entries[0];
        assert_eq!(entry.entry_id, "kitchen");
        assert_eq!(entry.options.temperature, 0.2);
        assert_eq!(entry.options.max_tokens, 64);
        assert_eq!(entry.options.top_k, 1);

        let google = config.google.apply(GoogleConfig::new("key"));
        assert_eq!(google.base_url, "http://localhost:1234");
        assert_eq!(google.api_version, "v1beta");
        assert_eq!(google.timeout_secs, 5);
    }

    #[test]
    fn test_empty_entries_rejected() {
        assert!(ServerConfig::parse("entries = []").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = ServerConfig::load_from("/definitely/not/hearth.toml").unwrap();
        assert_eq!(config.bind, "0.0.0.0:8000");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "location_name = \"Flat\"").unwrap();

        let config = ServerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.location_name, "Flat");
        assert_eq!(config.entries.len(), 1);
    }
}
