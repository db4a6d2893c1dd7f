//! Domain Entities
//!
//! - Area / Device: Home registry records
//! - RegistrySnapshot: Read-only view over areas and devices
//! - ConfigEntry: Configured conversation agent with its options
//! - Conversation: Input, context and result of a conversation turn
//! - IntentResponse: Structured outcome with speech

mod area;
mod config_entry;
mod conversation;
mod device;
mod intent_response;
mod registry;

pub use area::*;
pub use config_entry::*;
pub use conversation::*;
pub use device::*;
pub use intent_response::*;
pub use registry::*;
