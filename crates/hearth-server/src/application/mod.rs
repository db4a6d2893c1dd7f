//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! registries, chat backends and conversation agents.

mod agent_manager;
mod conversation_agent;
mod list_devices;
mod setup;

pub use agent_manager::{AgentInfo, AgentManager};
pub use conversation_agent::GoogleConversationAgent;
pub use list_devices::ListDevicesIntentHandler;
pub use setup::{setup_entry, unload_entry};
