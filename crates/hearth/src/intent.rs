//! Intents
//!
//! Named actions with typed slots. Handlers are registered in an
//! [`IntentRegistry`] and invoked with slot values wrapped as
//! `{ "value": ... }`.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{errors::DomainError, Context, IntentResponse};

pub const INTENT_NEVERMIND: &str = "HassNevermind";
pub const INTENT_GET_STATE: &str = "HassGetState";
pub const INTENT_GET_WEATHER: &str = "HassGetWeather";
pub const INTENT_GET_TEMPERATURE: &str = "HassClimateGetTemperature";

/// Type of a slot value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    String,
    Integer,
    Number,
    Boolean,
}

/// Declaration of a single slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub kind: SlotKind,
    pub required: bool,
}

impl SlotSpec {
    pub fn required(kind: SlotKind) -> Self {
        Self { kind, required: true }
    }

    pub fn optional(kind: SlotKind) -> Self {
        Self {
            kind,
            required: false,
        }
    }
}

/// Slots accepted by an intent, keyed by slot name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSchema {
    slots: BTreeMap<String, SlotSpec>,
}

impl SlotSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(mut self, name: impl Into<String>, spec: SlotSpec) -> Self {
        self.slots.insert(name.into(), spec);
        self
    }

    pub fn slots(&self) -> &BTreeMap<String, SlotSpec> {
        &self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Check and coerce arguments against the schema.
    ///
    /// Strings are accepted for numeric and boolean slots when they parse;
    /// scalars are accepted for string slots and stringified.
    pub fn validate(&self, args: &Map<String, Value>) -> Result<Map<String, Value>, DomainError> {
        if let Some(unknown) = args.keys().find(|k| !self.slots.contains_key(*k)) {
            return Err(DomainError::Validation(format!(
                "extra keys not allowed: {}",
                unknown
            )));
        }

        let mut validated = Map::new();
        for (name, spec) in &self.slots {
            match args.get(name) {
                Some(value) => {
                    let coerced = coerce(spec.kind, value).ok_or_else(|| {
                        DomainError::Validation(format!(
                            "expected {:?} for slot '{}', got {}",
                            spec.kind, name, value
                        ))
                    })?;
                    validated.insert(name.clone(), coerced);
                }
                None if spec.required => {
                    return Err(DomainError::Validation(format!(
                        "required key not provided: {}",
                        name
                    )));
                }
                None => {}
            }
        }

        Ok(validated)
    }
}

fn coerce(kind: SlotKind, value: &Value) -> Option<Value> {
    match (kind, value) {
        (SlotKind::String, Value::String(_)) => Some(value.clone()),
        (SlotKind::String, Value::Number(n)) => Some(Value::String(n.to_string())),
        (SlotKind::String, Value::Bool(b)) => Some(Value::String(b.to_string())),
        (SlotKind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => Some(value.clone()),
        (SlotKind::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
        (SlotKind::Number, Value::Number(_)) => Some(value.clone()),
        (SlotKind::Number, Value::String(s)) => s.trim().parse::<f64>().ok().map(Value::from),
        (SlotKind::Boolean, Value::Bool(_)) => Some(value.clone()),
        (SlotKind::Boolean, Value::String(s)) => match s.to_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Some(Value::Bool(true)),
            "false" | "off" | "no" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        _ => None,
    }
}

/// A request to handle an intent
#[derive(Debug, Clone)]
pub struct IntentRequest {
    pub platform: String,
    pub intent_type: String,
    /// Slot name to `{ "value": ... }`
    pub slots: Map<String, Value>,
    pub text_input: Option<String>,
    pub context: Context,
    pub language: String,
    pub assistant: Option<String>,
}

impl IntentRequest {
    /// Raw value of a slot
    pub fn slot_value(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).and_then(|slot| slot.get("value"))
    }
}

/// Handler of a single intent type
#[async_trait]
pub trait IntentHandler: Send + Sync {
    fn intent_type(&self) -> &str;

    /// Slots the intent accepts; `None` means no slots
    fn slot_schema(&self) -> Option<SlotSchema> {
        None
    }

    async fn handle(&self, request: IntentRequest) -> Result<IntentResponse, DomainError>;
}

/// Registered intent handlers
#[derive(Default)]
pub struct IntentRegistry {
    handlers: RwLock<BTreeMap<String, Arc<dyn IntentHandler>>>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler, replacing any handler of the same type
    pub fn register(&self, handler: Arc<dyn IntentHandler>) {
        let intent_type = handler.intent_type().to_string();
        debug!(intent_type = %intent_type, "Registering intent handler");
        self.write().insert(intent_type, handler);
    }

    pub fn handlers(&self) -> Vec<Arc<dyn IntentHandler>> {
        self.read().values().cloned().collect()
    }

    pub fn get(&self, intent_type: &str) -> Option<Arc<dyn IntentHandler>> {
        self.read().get(intent_type).cloned()
    }

    /// Handle an intent with plain slot values
    #[allow(clippy::too_many_arguments)]
    pub async fn handle(
        &self,
        platform: &str,
        intent_type: &str,
        slots: Map<String, Value>,
        text_input: Option<String>,
        context: Context,
        language: Option<String>,
        assistant: Option<String>,
    ) -> Result<IntentResponse, DomainError> {
        let handler = self
            .get(intent_type)
            .ok_or_else(|| DomainError::not_found("intent", intent_type))?;

        let request = IntentRequest {
            platform: platform.to_string(),
            intent_type: intent_type.to_string(),
            slots: wrap_slots(slots),
            text_input,
            context,
            language: language.unwrap_or_else(|| "en".to_string()),
            assistant,
        };

        debug!(platform = %platform, intent_type = %intent_type, "Handling intent");
        handler.handle(request).await
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<dyn IntentHandler>>> {
        self.handlers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<dyn IntentHandler>>> {
        self.handlers.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// `{"area": "kitchen"}` becomes `{"area": {"value": "kitchen"}}`
pub fn wrap_slots(args: Map<String, Value>) -> Map<String, Value> {
    args.into_iter()
        .map(|(key, value)| (key, serde_json::json!({ "value": value })))
        .collect()
}

/// Built-in handler that acknowledges and does nothing
pub struct NevermindIntentHandler;

#[async_trait]
impl IntentHandler for NevermindIntentHandler {
    fn intent_type(&self) -> &str {
        INTENT_NEVERMIND
    }

    async fn handle(&self, request: IntentRequest) -> Result<IntentResponse, DomainError> {
        Ok(IntentResponse::new(request.language))
    }
}
