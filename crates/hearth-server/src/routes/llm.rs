//! LLM Routes - Tool APIs for language models

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;

use hearth::ToolInput;

use crate::models::{LlmApiResponse, ToolCallRequest, DEFAULT_TOOL_PLATFORM};
use crate::routes::{error_response, ApiError};
use crate::AppState;

/// List LLM tool APIs
#[utoipa::path(
    get,
    path = "/api/llm/apis",
    responses(
        (status = 200, description = "Registered tool APIs", body = Vec<LlmApiResponse>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "LLM"
)]
pub async fn list_apis(State(state): State<AppState>) -> Json<Vec<LlmApiResponse>> {
    let apis = state.llm_apis.list();
    Json(apis.iter().map(|api| LlmApiResponse::from_api(api.as_ref())).collect())
}

/// Call a tool of an LLM API
#[utoipa::path(
    post,
    path = "/api/llm/apis/{api_id}/tools/{tool_name}",
    params(
        ("api_id" = String, Path, description = "Tool API ID"),
        ("tool_name" = String, Path, description = "Tool name")
    ),
    request_body = ToolCallRequest,
    responses(
        (status = 200, description = "Tool result, usually an intent response"),
        (status = 400, description = "Invalid tool arguments"),
        (status = 404, description = "API or tool not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "LLM"
)]
pub async fn call_tool(
    State(state): State<AppState>,
    Path((api_id, tool_name)): Path<(String, String)>,
    Json(payload): Json<ToolCallRequest>,
) -> Result<Json<Value>, ApiError> {
    let api = state.llm_apis.get(&api_id).map_err(error_response)?;

    let input = ToolInput {
        tool_args: payload.tool_args,
        user_prompt: payload.user_prompt,
        language: payload.language,
        assistant: payload.assistant,
        ..ToolInput::new(
            tool_name,
            payload
                .platform
                .unwrap_or_else(|| DEFAULT_TOOL_PLATFORM.to_string()),
        )
    };

    let result = api.call_tool(input).await.map_err(error_response)?;
    Ok(Json(result))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/llm/apis", get(list_apis))
        .route("/api/llm/apis/:api_id/tools/:tool_name", post(call_tool))
}
