//! Hearth Domain Library
//!
//! Core domain types and interfaces for Hearth conversation agents.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure entities and logic
//!   - `entities/`: Areas, devices, config entries, conversations, intent responses
//!   - `value_objects/`: Response types, error codes, supported languages
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Read access to the home registry
//!   - `services/`: Generative chat backends
//!
//! - **Template** (`template`): Prompt rendering over a registry snapshot
//! - **Intent** (`intent`): Intent handlers and their registry
//! - **LLM** (`llm`): Intent tools exposed to language models
//!
//! # Usage
//!
//! ```rust,ignore
//! use hearth::{ConversationInput, ConversationAgent, GenerativeChat, HomeRegistry};
//! ```

pub mod domain;
pub mod intent;
pub mod llm;
pub mod ports;
pub mod template;

// Re-export commonly used types
pub use domain::{
    Area, ConfigEntry, Context, ConversationInput, ConversationOptions, ConversationResult,
    Device, DeviceDisabler, DeviceEntryType, DeviceSpec, DomainError, EntityState,
    IntentResponse, IntentResponseErrorCode, IntentResponseType, RegistrySnapshot,
    ResponseTarget, SupportedLanguages, MATCH_ALL,
};
pub use intent::{IntentHandler, IntentRegistry, IntentRequest, SlotKind, SlotSchema, SlotSpec};
pub use llm::{AssistApi, IntentTool, LlmApi, LlmApiRegistry, Tool, ToolInput};
pub use ports::{
    ChatContent, ChatError, ChatReply, ChatRequest, ChatRole, ConversationAgent,
    GenerationConfig, GenerativeChat, HomeRegistry, ModelInfo,
};
pub use template::PromptTemplate;
