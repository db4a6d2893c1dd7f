//! Home Registry Port
//!
//! Read-only access to the areas and devices of the home.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, RegistrySnapshot};

/// Source of area and device records
#[async_trait]
pub trait HomeRegistry: Send + Sync {
    /// Consistent copy of all areas and devices, in registry order
    async fn snapshot(&self) -> Result<RegistrySnapshot, DomainError>;
}
