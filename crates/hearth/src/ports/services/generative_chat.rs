//! Generative Chat Port
//!
//! Abstract interface for hosted chat models (Google Generative AI and
//! friends). A request carries the whole chat history, so implementations
//! stay stateless.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// One turn of chat history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatContent {
    pub role: ChatRole,
    pub parts: Vec<String>,
}

impl ChatContent {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            parts: vec![text.into()],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            parts: vec![text.into()],
        }
    }

    pub fn text(&self) -> String {
        self.parts.concat()
    }
}

/// Sampling parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

/// A chat message sent on top of existing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Model name, e.g. `models/gemini-pro`
    pub model: String,
    pub generation_config: GenerationConfig,
    pub history: Vec<ChatContent>,
    pub message: String,
}

/// Reply of the model
///
/// Empty `parts` means the model produced nothing, usually because the
/// content was blocked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub parts: Vec<String>,
}

impl ChatReply {
    pub fn new(parts: Vec<String>) -> Self {
        Self { parts }
    }

    pub fn text(&self) -> String {
        self.parts.concat()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Model metadata returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: Option<String>,
    pub input_token_limit: Option<u32>,
    pub output_token_limit: Option<u32>,
}

/// Chat backend errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ChatError {
    /// Request-level failure. `status` is `None` when no HTTP response arrived.
    #[error("{} {}", status_label(.status), .message)]
    Client {
        status: Option<u16>,
        message: String,
    },

    #[error("{0}")]
    InvalidResponse(String),

    #[error("Prompt blocked: {0}")]
    BlockedPrompt(String),

    #[error("Generation stopped: {0}")]
    StopCandidate(String),
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "None".to_string(),
    }
}

impl ChatError {
    pub fn client(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Client {
            status,
            message: message.into(),
        }
    }

    /// Whether the backend rejected the API key
    pub fn is_invalid_api_key(&self) -> bool {
        matches!(self, Self::Client { message, .. } if message.contains("API_KEY_INVALID"))
    }
}

/// Generative chat interface
#[async_trait]
pub trait GenerativeChat: Send + Sync {
    /// Send `request.message` after `request.history` and return the reply
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;

    /// Look up a model; used to validate configuration during setup
    async fn get_model(&self, model: &str) -> Result<ModelInfo, ChatError>;

    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;
}
