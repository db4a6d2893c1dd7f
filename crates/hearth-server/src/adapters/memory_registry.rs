//! In-memory Home Registry
//!
//! Holds areas and devices in registration order. Can be seeded from a
//! JSON file:
//!
//! ```json
//! {
//!   "config_entry_id": "import",
//!   "areas": ["Kitchen"],
//!   "devices": [
//!     { "connections": [["zigbee", "00:11"]], "name": "Lamp", "suggested_area": "Kitchen" }
//!   ]
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use hearth::{
    Area, Device, DeviceDisabler, DeviceSpec, DomainError, HomeRegistry, RegistrySnapshot,
};

/// Seed file layout
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default = "default_import_entry")]
    config_entry_id: String,
    #[serde(default)]
    areas: Vec<String>,
    #[serde(default)]
    devices: Vec<DeviceSpec>,
}

fn default_import_entry() -> String {
    "import".to_string()
}

/// Area and device registry kept in memory
#[derive(Default)]
pub struct InMemoryRegistry {
    state: RwLock<RegistrySnapshot>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a JSON seed file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::Repository(format!("Failed to read registry {:?}: {}", path, e))
        })?;

        let file: RegistryFile = serde_json::from_str(&content).map_err(|e| {
            DomainError::Repository(format!("Failed to parse registry {:?}: {}", path, e))
        })?;

        let registry = Self::new();
        for name in &file.areas {
            registry.create_area(name).await?;
        }
        for mut spec in file.devices {
            let disabled_by = spec.disabled_by.take();
            let device = registry
                .get_or_create_device(&file.config_entry_id, spec)
                .await?;
            if disabled_by.is_some() {
                registry
                    .update_device_disabled(&device.id, disabled_by)
                    .await?;
            }
        }

        let snapshot = registry.state.read().await;
        info!(
            areas = snapshot.areas.len(),
            devices = snapshot.devices.len(),
            "Loaded registry from {:?}",
            path
        );
        drop(snapshot);

        Ok(registry)
    }

    /// Create a new area; names must be unique
    pub async fn create_area(&self, name: &str) -> Result<Area, DomainError> {
        let mut state = self.state.write().await;
        let area = Area::new(name);

        if state.areas.iter().any(|a| a.id == area.id) {
            return Err(DomainError::Conflict(format!(
                "The name {} ({}) is already in use",
                name, area.id
            )));
        }

        debug!(area_id = %area.id, "Created area");
        state.areas.push(area.clone());
        Ok(area)
    }

    /// Return the device owning one of the spec's connections, or register a new one.
    ///
    /// A suggested area is only applied to new devices and is created when missing.
    /// New devices start enabled; use [`Self::update_device_disabled`] to disable them.
    pub async fn get_or_create_device(
        &self,
        config_entry_id: &str,
        spec: DeviceSpec,
    ) -> Result<Device, DomainError> {
        if spec.connections.is_empty() {
            return Err(DomainError::Validation(
                "A device needs at least one connection".to_string(),
            ));
        }

        let mut state = self.state.write().await;

        if let Some(existing) = state
            .devices
            .iter_mut()
            .find(|d| d.matches_any(&spec.connections))
        {
            if !existing.config_entries.iter().any(|e| e == config_entry_id) {
                existing.config_entries.push(config_entry_id.to_string());
            }
            return Ok(existing.clone());
        }

        let area_id = match spec.suggested_area.as_deref() {
            Some(name) => Some(area_id_for(&mut state, name)),
            None => None,
        };

        let device = Device::from_spec(config_entry_id, spec, area_id);

        debug!(device_id = %device.id, name = ?device.name, "Created device");
        state.devices.push(device.clone());
        Ok(device)
    }

    /// Enable (`None`) or disable a device
    pub async fn update_device_disabled(
        &self,
        device_id: &str,
        disabled_by: Option<DeviceDisabler>,
    ) -> Result<Device, DomainError> {
        let mut state = self.state.write().await;
        let device = state
            .devices
            .iter_mut()
            .find(|d| d.id == device_id)
            .ok_or_else(|| DomainError::not_found("device", device_id))?;

        device.disabled_by = disabled_by;
        Ok(device.clone())
    }
}

/// Id of the area with this name, creating it when missing
fn area_id_for(state: &mut RegistrySnapshot, name: &str) -> String {
    let candidate = Area::new(name);
    if let Some(area) = state
        .areas
        .iter()
        .find(|a| a.id == candidate.id || a.name.eq_ignore_ascii_case(name))
    {
        return area.id.clone();
    }

    let id = candidate.id.clone();
    state.areas.push(candidate);
    id
}

#[async_trait]
impl HomeRegistry for InMemoryRegistry {
    async fn snapshot(&self) -> Result<RegistrySnapshot, DomainError> {
        Ok(self.state.read().await.clone())
    }
}
