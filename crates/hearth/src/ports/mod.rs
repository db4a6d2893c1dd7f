//! Ports (Interfaces)
//!
//! Abstract interfaces that define how the domain layer
//! interacts with external systems (registries, chat backends, agents).
//!
//! Implementations of these traits live in the infrastructure layer.

pub mod conversation_agent;
pub mod repositories;
pub mod services;

// Re-exports
pub use conversation_agent::*;
pub use repositories::*;
pub use services::*;
