//! Configuration management for Hearth CLI
//!
//! Stores the API token, server URL and defaults in ~/.config/hearth/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "hearth";
const CONFIG_FILE: &str = "config.toml";

/// CLI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Agent used when `--agent` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: default_base_url(),
            default_agent: None,
            language: None,
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Agent to talk to: explicit choice, then the configured default
    pub fn agent<'a>(&'a self, agent: Option<&'a str>) -> Option<&'a str> {
        agent.or(self.default_agent.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_agent_precedence() {
        let config = Config {
            default_agent: Some("conversation.kitchen".into()),
            ..Config::default()
        };
        assert_eq!(config.agent(None), Some("conversation.kitchen"));
        assert_eq!(config.agent(Some("conversation.hall")), Some("conversation.hall"));
        assert_eq!(Config::default().agent(None), None);
    }

    #[test]
    fn test_unset_fields_are_not_written() {
        let content = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!content.contains("api_token"));

        let parsed = Config::parse(&content).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
