//! Service Ports
//!
//! Abstract interfaces for external services.

pub mod generative_chat;

pub use generative_chat::*;
