//! Conversation - A single turn handed to an agent

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ulid::Ulid;

use super::IntentResponse;

/// Caller context attached to a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub id: String,
    pub user_id: Option<String>,
    pub parent_id: Option<String>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            id: Ulid::new().to_string(),
            user_id: None,
            parent_id: None,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

/// User input for one conversation turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationInput {
    pub text: String,
    pub context: Context,
    pub conversation_id: Option<String>,
    pub language: String,
}

impl ConversationInput {
    pub fn new(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: Context::new(),
            conversation_id: None,
            language: language.into(),
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_context(mut self, context: Context) -> Self {
        self.context = context;
        self
    }
}

/// Outcome of a conversation turn
#[derive(Debug, Clone)]
pub struct ConversationResult {
    pub response: IntentResponse,
    pub conversation_id: Option<String>,
}

impl ConversationResult {
    pub fn new(response: IntentResponse, conversation_id: Option<String>) -> Self {
        Self {
            response,
            conversation_id,
        }
    }

    pub fn as_dict(&self) -> Value {
        serde_json::json!({
            "response": self.response.as_dict(),
            "conversation_id": self.conversation_id,
        })
    }
}
