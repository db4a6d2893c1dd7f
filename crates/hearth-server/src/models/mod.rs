//! Hearth API Data Models
//!
//! - Conversation: turns and registered agents
//! - LLM: tool APIs and tool calls

mod conversation;
mod llm;

pub use conversation::*;
pub use llm::*;
