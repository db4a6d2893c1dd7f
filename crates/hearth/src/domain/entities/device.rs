//! Device - A physical device or service registered in the home

use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

/// Kind of device entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceEntryType {
    /// A hosted service rather than a physical device
    Service,
}

/// Who disabled a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceDisabler {
    ConfigEntry,
    Integration,
    User,
}

/// (domain, identifier) pair that uniquely identifies a device
pub type Connection = (String, String);

/// Device registry record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub config_entries: Vec<String>,
    pub connections: Vec<Connection>,
    pub name: Option<String>,
    pub name_by_user: Option<String>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub area_id: Option<String>,
    pub entry_type: Option<DeviceEntryType>,
    pub disabled_by: Option<DeviceDisabler>,
}

impl Device {
    /// Create a device from a spec; the suggested area is resolved by the registry
    pub fn from_spec(config_entry_id: &str, spec: DeviceSpec, area_id: Option<String>) -> Self {
        Self {
            id: Ulid::new().to_string().to_lowercase(),
            config_entries: vec![config_entry_id.to_string()],
            connections: spec.connections,
            name: spec.name,
            name_by_user: None,
            manufacturer: spec.manufacturer,
            model: spec.model,
            area_id,
            entry_type: spec.entry_type,
            disabled_by: None,
        }
    }

    /// Name shown to users; a user-assigned name wins over the integration's
    pub fn display_name(&self) -> Option<&str> {
        self.name_by_user.as_deref().or(self.name.as_deref())
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled_by.is_some()
    }

    pub fn is_service(&self) -> bool {
        self.entry_type == Some(DeviceEntryType::Service)
    }

    /// Whether any of the given connections belong to this device
    pub fn matches_any(&self, connections: &[Connection]) -> bool {
        connections.iter().any(|c| self.connections.contains(c))
    }
}

/// Input for registering a device
///
/// Integrations sometimes report numeric names or models; those are
/// accepted and stored as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceSpec {
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub manufacturer: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub model: Option<String>,
    #[serde(default)]
    pub suggested_area: Option<String>,
    #[serde(default)]
    pub entry_type: Option<DeviceEntryType>,
    #[serde(default)]
    pub disabled_by: Option<DeviceDisabler>,
}

impl DeviceSpec {
    pub fn new(connection: (impl Into<String>, impl Into<String>)) -> Self {
        Self {
            connections: vec![(connection.0.into(), connection.1.into())],
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_suggested_area(mut self, area: impl Into<String>) -> Self {
        self.suggested_area = Some(area.into());
        self
    }

    pub fn with_entry_type(mut self, entry_type: DeviceEntryType) -> Self {
        self.entry_type = Some(entry_type);
        self
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}
