//! Device listing intent
//!
//! Answers which devices exist, optionally limited to one area. Registered
//! with the intent registry so the `assist` LLM API exposes it as a tool.

use std::sync::Arc;

use async_trait::async_trait;

use hearth::{
    DomainError, HomeRegistry, IntentHandler, IntentRequest, IntentResponse,
    IntentResponseErrorCode, IntentResponseType, ResponseTarget, SlotKind, SlotSchema, SlotSpec,
};

pub const INTENT_LIST_DEVICES: &str = "HearthListDevices";

pub struct ListDevicesIntentHandler<R: HomeRegistry> {
    registry: Arc<R>,
}

impl<R: HomeRegistry> ListDevicesIntentHandler<R> {
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl<R: HomeRegistry + 'static> IntentHandler for ListDevicesIntentHandler<R> {
    fn intent_type(&self) -> &str {
        INTENT_LIST_DEVICES
    }

    fn slot_schema(&self) -> Option<SlotSchema> {
        Some(SlotSchema::new().with_slot("area", SlotSpec::optional(SlotKind::String)))
    }

    async fn handle(&self, request: IntentRequest) -> Result<IntentResponse, DomainError> {
        let snapshot = self.registry.snapshot().await?;
        let mut response = IntentResponse::new(request.language.clone());

        let area = match request.slot_value("area").and_then(|v| v.as_str()) {
            Some(name) => {
                let found = snapshot
                    .areas
                    .iter()
                    .find(|a| a.id == name || a.name.eq_ignore_ascii_case(name));
                match found {
                    Some(area) => Some(area),
                    None => {
                        response.set_error(
                            IntentResponseErrorCode::NoValidTargets,
                            format!("No area named {}", name),
                        );
                        return Ok(response);
                    }
                }
            }
            None => None,
        };

        let devices: Vec<ResponseTarget> = snapshot
            .devices
            .iter()
            .filter(|d| !d.is_disabled() && !d.is_service())
            .filter(|d| area.map_or(true, |a| d.area_id.as_deref() == Some(a.id.as_str())))
            .filter_map(|d| {
                d.display_name().map(|name| ResponseTarget {
                    name: name.to_string(),
                    kind: "device".to_string(),
                    id: Some(d.id.clone()),
                })
            })
            .collect();

        if let Some(area) = area {
            response.intent_targets.push(ResponseTarget {
                name: area.name.clone(),
                kind: "area".to_string(),
                id: Some(area.id.clone()),
            });
        }

        let names: Vec<&str> = devices.iter().map(|d| d.name.as_str()).collect();
        response.response_type = IntentResponseType::QueryAnswer;
        response.set_speech(if names.is_empty() {
            "There are no devices".to_string()
        } else {
            names.join(", ")
        });
        response.success_results = devices;

        Ok(response)
    }
}
