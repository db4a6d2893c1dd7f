//! RegistrySnapshot - Read-only view of the home registry

use serde::{Deserialize, Serialize};

use super::{Area, Device};

/// Areas and devices in registry order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub areas: Vec<Area>,
    pub devices: Vec<Device>,
}

impl RegistrySnapshot {
    pub fn new(areas: Vec<Area>, devices: Vec<Device>) -> Self {
        Self { areas, devices }
    }

    pub fn area(&self, area_id: &str) -> Option<&Area> {
        self.areas.iter().find(|a| a.id == area_id)
    }

    pub fn device(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == device_id)
    }

    /// Devices assigned to an area, in registration order
    pub fn area_devices<'a>(&'a self, area_id: &'a str) -> impl Iterator<Item = &'a Device> + 'a {
        self.devices
            .iter()
            .filter(move |d| d.area_id.as_deref() == Some(area_id))
    }
}
