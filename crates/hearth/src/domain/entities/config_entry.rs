//! ConfigEntry - A configured conversation agent

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::template::DEFAULT_PROMPT;

pub const DEFAULT_CHAT_MODEL: &str = "models/gemini-pro";
pub const DEFAULT_TEMPERATURE: f32 = 0.9;
pub const DEFAULT_TOP_P: f32 = 1.0;
pub const DEFAULT_TOP_K: u32 = 1;
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// User-editable options of a conversation agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationOptions {
    /// Prompt template rendered before every turn
    #[serde(default = "default_prompt")]
    pub prompt: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_top_p() -> f32 {
    DEFAULT_TOP_P
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl Default for ConversationOptions {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            chat_model: default_chat_model(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// A configured agent instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default = "new_entry_id")]
    pub entry_id: String,
    pub title: String,
    #[serde(default)]
    pub options: ConversationOptions,
}

fn new_entry_id() -> String {
    Ulid::new().to_string()
}

impl ConfigEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            entry_id: new_entry_id(),
            title: title.into(),
            options: ConversationOptions::default(),
        }
    }

    pub fn with_entry_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = entry_id.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.options.prompt = prompt.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_fill_defaults() {
        let options: ConversationOptions =
            serde_json::from_str(r#"{"temperature": 0.2}"#).unwrap();

        assert_eq!(options.temperature, 0.2);
        assert_eq!(options.chat_model, DEFAULT_CHAT_MODEL);
        assert_eq!(options.top_k, DEFAULT_TOP_K);
        assert_eq!(options.max_tokens, DEFAULT_MAX_TOKENS);
        assert_eq!(options.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn test_entry_builder() {
        let entry = ConfigEntry::new("Google Generative AI Conversation")
            .with_entry_id("abc")
            .with_prompt("be brief");

        assert_eq!(entry.entry_id, "abc");
        assert_eq!(entry.options.prompt, "be brief");
        assert_eq!(entry.options.top_p, DEFAULT_TOP_P);
    }
}
