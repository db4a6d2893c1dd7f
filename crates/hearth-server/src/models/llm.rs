//! LLM - Tool APIs exposed to language models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use hearth::{LlmApi, Tool};

pub const DEFAULT_TOOL_PLATFORM: &str = "http";

/// Tool API with its tools
#[derive(Debug, Serialize, ToSchema)]
pub struct LlmApiResponse {
    pub id: String,
    pub name: String,
    pub prompt_template: String,
    pub tools: Vec<ToolResponse>,
}

impl LlmApiResponse {
    pub fn from_api(api: &dyn LlmApi) -> Self {
        Self {
            id: api.id().to_string(),
            name: api.name().to_string(),
            prompt_template: api.prompt_template().to_string(),
            tools: api.tools().iter().map(|t| ToolResponse::from_tool(t.as_ref())).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToolResponse {
    pub name: String,
    pub description: Option<String>,
    /// Slot name to `{ kind, required }`
    #[schema(value_type = Object)]
    pub parameters: Value,
}

impl ToolResponse {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().map(str::to_string),
            parameters: serde_json::to_value(tool.parameters().slots()).unwrap_or(Value::Null),
        }
    }
}

/// Call a tool
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ToolCallRequest {
    #[serde(default)]
    #[schema(value_type = Object)]
    pub tool_args: Map<String, Value>,
    /// Defaults to `http`
    pub platform: Option<String>,
    pub user_prompt: Option<String>,
    pub language: Option<String>,
    pub assistant: Option<String>,
}
