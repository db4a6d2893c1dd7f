//! Intent response type and error codes

use serde::{Deserialize, Serialize};

/// Kind of intent response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentResponseType {
    /// Intent caused an action to occur
    ActionDone,
    /// Intent caused an action, but it could only be partially done
    PartialActionDone,
    /// Response is an answer to a question
    QueryAnswer,
    /// Response is an error
    Error,
}

/// Reason for an error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentResponseErrorCode {
    NoIntentMatch,
    NoValidTargets,
    FailedToHandle,
    Unknown,
}

impl IntentResponseErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoIntentMatch => "no_intent_match",
            Self::NoValidTargets => "no_valid_targets",
            Self::FailedToHandle => "failed_to_handle",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for IntentResponseErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
