//! Repository Ports
//!
//! Abstract interfaces for registry access.

pub mod home_registry;

pub use home_registry::*;
