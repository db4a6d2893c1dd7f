//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod memory_registry;

// Re-exports
pub use memory_registry::InMemoryRegistry;
