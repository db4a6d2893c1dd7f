//! Prompt Templates
//!
//! Prompts are Jinja-style templates rendered with `minijinja` before every
//! conversation turn. Templates see the location name, a ready-made device
//! overview and a few registry lookup functions:
//!
//! - `ha_name`: location name of the home
//! - `devices_overview`: output of [`device_overview`]
//! - `areas()`: area ids in registry order
//! - `area_name(area_id)`: area name
//! - `area_devices(area_id)`: device ids assigned to the area
//! - `device_attr(device_id, attr)`: one attribute of a device

use std::sync::Arc;

use minijinja::{context, Environment, Value};

use crate::domain::{
    errors::DomainError, Device, DeviceDisabler, DeviceEntryType, RegistrySnapshot,
};

pub const DEFAULT_PROMPT: &str = "This smart home is controlled by {{ ha_name }}.

An overview of the areas and the devices in this smart home:

{{ devices_overview }}

Answer the user's questions about the world truthfully.

If the user wants to control a device, reject the request and suggest using the Hearth app.";

/// A user-editable prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
}

impl PromptTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Render the template against a registry snapshot
    pub fn render(
        &self,
        location_name: &str,
        snapshot: RegistrySnapshot,
    ) -> Result<String, DomainError> {
        let overview = device_overview(&snapshot);
        let env = registry_environment(Arc::new(snapshot));

        env.render_str(
            &self.source,
            context! {
                ha_name => location_name,
                devices_overview => overview,
            },
        )
        .map_err(|e| DomainError::Template(e.to_string()))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

/// Describe every area with the devices a user would talk about.
///
/// Disabled devices, services and unnamed devices are left out, as are
/// areas without any remaining device. The model is appended in
/// parentheses unless the name already contains it.
pub fn device_overview(snapshot: &RegistrySnapshot) -> String {
    let mut blocks = Vec::new();

    for area in &snapshot.areas {
        let lines: Vec<String> = snapshot
            .area_devices(&area.id)
            .filter(|d| !d.is_disabled() && !d.is_service())
            .filter_map(overview_line)
            .collect();

        if lines.is_empty() {
            continue;
        }

        blocks.push(format!("{}:\n{}", area.name, lines.join("\n")));
    }

    blocks.join("\n\n")
}

fn overview_line(device: &Device) -> Option<String> {
    let name = device.display_name().filter(|n| !n.is_empty())?;

    let line = match device.model.as_deref() {
        Some(model) if !model.is_empty() && !name.contains(model) => {
            format!("- {} ({})", name, model)
        }
        _ => format!("- {}", name),
    };

    Some(line)
}

fn registry_environment(snapshot: Arc<RegistrySnapshot>) -> Environment<'static> {
    let mut env = Environment::new();

    let registry = snapshot.clone();
    env.add_function("areas", move || -> Vec<String> {
        registry.areas.iter().map(|a| a.id.clone()).collect()
    });

    let registry = snapshot.clone();
    env.add_function("area_name", move |area_id: String| -> Option<String> {
        registry.area(&area_id).map(|a| a.name.clone())
    });

    let registry = snapshot.clone();
    env.add_function("area_devices", move |area_id: String| -> Vec<String> {
        registry
            .area_devices(&area_id)
            .map(|d| d.id.clone())
            .collect()
    });

    let registry = snapshot;
    env.add_function(
        "device_attr",
        move |device_id: String, attr: String| -> Value {
            registry
                .device(&device_id)
                .map(|d| device_attr(d, &attr))
                .unwrap_or_else(|| Value::from(()))
        },
    );

    env
}

fn device_attr(device: &Device, attr: &str) -> Value {
    match attr {
        "id" => Value::from(device.id.clone()),
        "name" => Value::from(device.name.clone()),
        "name_by_user" => Value::from(device.name_by_user.clone()),
        "manufacturer" => Value::from(device.manufacturer.clone()),
        "model" => Value::from(device.model.clone()),
        "area_id" => Value::from(device.area_id.clone()),
        "disabled_by" => Value::from(device.disabled_by.map(disabler_name)),
        "entry_type" => Value::from(device.entry_type.map(entry_type_name)),
        _ => Value::from(()),
    }
}

fn disabler_name(disabler: DeviceDisabler) -> &'static str {
    match disabler {
        DeviceDisabler::ConfigEntry => "config_entry",
        DeviceDisabler::Integration => "integration",
        DeviceDisabler::User => "user",
    }
}

fn entry_type_name(entry_type: DeviceEntryType) -> &'static str {
    match entry_type {
        DeviceEntryType::Service => "service",
    }
}
