//! Conversation - Turns handed to a conversation agent

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use hearth::ConversationResult;

use crate::application::AgentInfo;

// ============================================
// Request/Response DTOs
// ============================================

/// Process a sentence
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRequest {
    pub text: String,
    /// Continue an existing conversation
    pub conversation_id: Option<String>,
    /// Defaults to the server language
    pub language: Option<String>,
    /// Config entry id or entity id of the agent
    pub agent_id: Option<String>,
}

/// Outcome of a conversation turn
#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessResponse {
    /// Intent response (`speech`, `card`, `language`, `response_type`, `data`)
    #[schema(value_type = Object)]
    pub response: Value,
    pub conversation_id: Option<String>,
}

impl From<ConversationResult> for ProcessResponse {
    fn from(result: ConversationResult) -> Self {
        let mut dict = result.as_dict();
        Self {
            response: dict["response"].take(),
            conversation_id: result.conversation_id,
        }
    }
}

/// Registered conversation agent
#[derive(Debug, Serialize, ToSchema)]
pub struct AgentResponse {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    /// `"*"` or a list of language codes
    #[schema(value_type = Object)]
    pub supported_languages: Value,
}

impl From<AgentInfo> for AgentResponse {
    fn from(info: AgentInfo) -> Self {
        Self {
            id: info.id,
            entity_id: info.entity_id,
            name: info.name,
            supported_languages: serde_json::to_value(&info.supported_languages)
                .unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth::IntentResponse;

    #[test]
    fn test_process_response_from_result() {
        let mut response = IntentResponse::new("en");
        response.set_speech("Hi there!");
        let result = ConversationResult::new(response, Some("01HX".into()));

        let body = serde_json::to_value(ProcessResponse::from(result)).unwrap();

        assert_eq!(body["conversation_id"], "01HX");
        assert_eq!(body["response"]["speech"]["plain"]["speech"], "Hi there!");
        assert_eq!(body["response"]["response_type"], "action_done");
        assert_eq!(body["response"]["language"], "en");
    }
}
