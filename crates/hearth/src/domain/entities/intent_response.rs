//! IntentResponse - Structured outcome of handling a sentence or intent

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::value_objects::{IntentResponseErrorCode, IntentResponseType};

/// Speech kind used for plain text
pub const SPEECH_PLAIN: &str = "plain";

/// Spoken part of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speech {
    pub speech: String,
    pub extra_data: Option<Value>,
}

/// Target an intent acted on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTarget {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: Option<String>,
}

/// Entity state matched while handling an intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
}

impl EntityState {
    pub fn new(entity_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            state: state.into(),
        }
    }
}

/// Response to an intent or a conversation turn
#[derive(Debug, Clone, PartialEq)]
pub struct IntentResponse {
    pub language: String,
    pub response_type: IntentResponseType,
    pub error_code: Option<IntentResponseErrorCode>,
    pub speech: BTreeMap<String, Speech>,
    pub card: BTreeMap<String, Value>,
    pub intent_targets: Vec<ResponseTarget>,
    pub success_results: Vec<ResponseTarget>,
    pub failed_results: Vec<ResponseTarget>,
    pub matched_states: Vec<EntityState>,
    pub unmatched_states: Vec<EntityState>,
}

impl IntentResponse {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            response_type: IntentResponseType::ActionDone,
            error_code: None,
            speech: BTreeMap::new(),
            card: BTreeMap::new(),
            intent_targets: Vec::new(),
            success_results: Vec::new(),
            failed_results: Vec::new(),
            matched_states: Vec::new(),
            unmatched_states: Vec::new(),
        }
    }

    /// Set plain speech
    pub fn set_speech(&mut self, speech: impl Into<String>) {
        self.speech.insert(
            SPEECH_PLAIN.to_string(),
            Speech {
                speech: speech.into(),
                extra_data: None,
            },
        );
    }

    /// Turn the response into an error with a spoken message
    pub fn set_error(&mut self, code: IntentResponseErrorCode, message: impl Into<String>) {
        self.response_type = IntentResponseType::Error;
        self.error_code = Some(code);
        self.set_speech(message);
    }

    /// Plain speech text, if any
    pub fn speech_text(&self) -> Option<&str> {
        self.speech.get(SPEECH_PLAIN).map(|s| s.speech.as_str())
    }

    pub fn is_error(&self) -> bool {
        self.response_type == IntentResponseType::Error
    }

    /// Wire representation shared by the HTTP API and LLM tools
    pub fn as_dict(&self) -> Value {
        let data = match self.response_type {
            IntentResponseType::Error => json!({
                "code": self.error_code.unwrap_or(IntentResponseErrorCode::Unknown),
            }),
            _ => json!({
                "targets": self.intent_targets,
                "success": self.success_results,
                "failed": self.failed_results,
            }),
        };

        json!({
            "speech": self.speech,
            "card": self.card,
            "language": self.language,
            "response_type": self.response_type,
            "data": data,
        })
    }
}
