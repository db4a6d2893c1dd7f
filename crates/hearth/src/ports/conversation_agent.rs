//! Conversation Agent Port
//!
//! Anything that can answer a sentence. The agent manager routes
//! conversation turns to implementations of this trait.

use async_trait::async_trait;

use crate::domain::{ConversationInput, ConversationResult, SupportedLanguages};

/// Conversation agent interface
///
/// Failures are reported inside the returned [`ConversationResult`] as an
/// error intent response, never as a Rust error.
#[async_trait]
pub trait ConversationAgent: Send + Sync {
    /// Languages this agent accepts
    fn supported_languages(&self) -> SupportedLanguages;

    /// Process a sentence
    async fn process(&self, input: ConversationInput) -> ConversationResult;
}
