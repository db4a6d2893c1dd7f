//! Value Objects
//!
//! Immutable value types with no identity.

mod response_type;
mod supported_languages;

pub use response_type::*;
pub use supported_languages::*;
