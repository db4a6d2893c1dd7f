//! LLM Tool APIs
//!
//! Collections of tools that language models may call. The built-in
//! `assist` API turns every registered intent handler into a tool.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::domain::{errors::DomainError, Context};
use crate::intent::{
    IntentHandler, IntentRegistry, SlotSchema, INTENT_GET_STATE, INTENT_GET_TEMPERATURE,
    INTENT_GET_WEATHER, INTENT_NEVERMIND,
};

pub const ASSIST_API_ID: &str = "assist";
pub const ASSIST_API_NAME: &str = "Assist";
pub const ASSIST_PROMPT_TEMPLATE: &str =
    "Call the intent tools to control the system. Just pass the name to the intent.";

/// Intents that are not useful as tools
const IGNORE_INTENTS: [&str; 4] = [
    INTENT_NEVERMIND,
    INTENT_GET_STATE,
    INTENT_GET_WEATHER,
    INTENT_GET_TEMPERATURE,
];

/// A tool call requested by a language model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub tool_name: String,
    #[serde(default)]
    pub tool_args: Map<String, Value>,
    pub platform: String,
    #[serde(default)]
    pub context: Option<Context>,
    #[serde(default)]
    pub user_prompt: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub assistant: Option<String>,
}

impl ToolInput {
    pub fn new(tool_name: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            tool_args: Map::new(),
            platform: platform.into(),
            context: None,
            user_prompt: None,
            language: None,
            assistant: None,
        }
    }
}

/// A callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> Option<&str> {
        None
    }

    fn parameters(&self) -> &SlotSchema;

    /// Call the tool with validated arguments and a resolved context
    async fn call(&self, input: ToolInput) -> Result<Value, DomainError>;
}

/// Tool representing an intent
pub struct IntentTool {
    name: String,
    description: String,
    parameters: SlotSchema,
    intents: Arc<IntentRegistry>,
}

impl IntentTool {
    pub fn new(handler: &dyn IntentHandler, intents: Arc<IntentRegistry>) -> Self {
        let name = handler.intent_type().to_string();
        Self {
            description: format!("Execute Hearth {} intent", name),
            parameters: handler.slot_schema().unwrap_or_default(),
            name,
            intents,
        }
    }
}

impl fmt::Display for IntentTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<IntentTool - {}>", self.name)
    }
}

#[async_trait]
impl Tool for IntentTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }

    fn parameters(&self) -> &SlotSchema {
        &self.parameters
    }

    async fn call(&self, input: ToolInput) -> Result<Value, DomainError> {
        let response = self
            .intents
            .handle(
                &input.platform,
                &self.name,
                input.tool_args,
                input.user_prompt,
                input.context.unwrap_or_default(),
                input.language,
                input.assistant,
            )
            .await?;

        Ok(response.as_dict())
    }
}

/// A set of tools exposed to language models
#[async_trait]
pub trait LlmApi: Send + Sync {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// Instructions appended to the model prompt when this API is active
    fn prompt_template(&self) -> &str;

    fn tools(&self) -> Vec<Arc<dyn Tool>>;

    /// Find the tool, validate its arguments and call it
    async fn call_tool(&self, input: ToolInput) -> Result<Value, DomainError> {
        let tool = self
            .tools()
            .into_iter()
            .find(|t| t.name() == input.tool_name)
            .ok_or_else(|| DomainError::not_found("tool", &input.tool_name))?;

        let tool_args = tool.parameters().validate(&input.tool_args)?;
        debug!(api = %self.id(), tool = %tool.name(), "Calling LLM tool");

        tool.call(ToolInput {
            tool_name: tool.name().to_string(),
            tool_args,
            context: Some(input.context.unwrap_or_default()),
            ..input
        })
        .await
    }
}

/// API exposing registered intents as tools
pub struct AssistApi {
    id: String,
    name: String,
    prompt_template: String,
    intents: Arc<IntentRegistry>,
}

impl AssistApi {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        prompt_template: impl Into<String>,
        intents: Arc<IntentRegistry>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prompt_template: prompt_template.into(),
            intents,
        }
    }

    /// The default `assist` API
    pub fn assist(intents: Arc<IntentRegistry>) -> Self {
        Self::new(ASSIST_API_ID, ASSIST_API_NAME, ASSIST_PROMPT_TEMPLATE, intents)
    }
}

#[async_trait]
impl LlmApi for AssistApi {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn prompt_template(&self) -> &str {
        &self.prompt_template
    }

    fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.intents
            .handlers()
            .into_iter()
            .filter(|h| !IGNORE_INTENTS.contains(&h.intent_type()))
            .map(|h| Arc::new(IntentTool::new(h.as_ref(), self.intents.clone())) as Arc<dyn Tool>)
            .collect()
    }
}

/// Registry of LLM APIs, seeded with `assist`
pub struct LlmApiRegistry {
    apis: RwLock<BTreeMap<String, Arc<dyn LlmApi>>>,
}

impl LlmApiRegistry {
    pub fn new(intents: Arc<IntentRegistry>) -> Self {
        let assist: Arc<dyn LlmApi> = Arc::new(AssistApi::assist(intents));
        let mut apis = BTreeMap::new();
        apis.insert(assist.id().to_string(), assist);

        Self {
            apis: RwLock::new(apis),
        }
    }

    /// Register an API; ids must be unique
    pub fn register(&self, api: Arc<dyn LlmApi>) -> Result<(), DomainError> {
        let mut apis = self.write();
        if apis.contains_key(api.id()) {
            return Err(DomainError::Conflict(format!(
                "API {} is already registered",
                api.id()
            )));
        }

        info!(api = %api.id(), "Registered LLM API");
        apis.insert(api.id().to_string(), api);
        Ok(())
    }

    pub fn get(&self, api_id: &str) -> Result<Arc<dyn LlmApi>, DomainError> {
        self.read()
            .get(api_id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("API", api_id))
    }

    pub fn list(&self) -> Vec<Arc<dyn LlmApi>> {
        self.read().values().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Arc<dyn LlmApi>>> {
        self.apis.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Arc<dyn LlmApi>>> {
        self.apis.write().unwrap_or_else(|e| e.into_inner())
    }
}
