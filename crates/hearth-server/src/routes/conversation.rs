//! Conversation Routes
//!
//! HTTP handlers that delegate to AgentManager.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::models::{AgentResponse, ProcessRequest, ProcessResponse};
use crate::routes::{error_response, ApiError};
use crate::AppState;

/// Process a sentence with a conversation agent
#[utoipa::path(
    post,
    path = "/api/conversation/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Turn processed; errors are reported in the intent response", body = ProcessResponse),
        (status = 400, description = "Agent ambiguous or language unsupported"),
        (status = 404, description = "Agent not found"),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Conversation"
)]
pub async fn process(
    State(state): State<AppState>,
    Json(payload): Json<ProcessRequest>,
) -> Result<Json<ProcessResponse>, ApiError> {
    let result = state
        .manager
        .converse(
            payload.text,
            payload.conversation_id,
            None,
            payload.language,
            payload.agent_id.as_deref(),
        )
        .await
        .map_err(error_response)?;

    Ok(Json(result.into()))
}

/// List registered conversation agents
#[utoipa::path(
    get,
    path = "/api/conversation/agents",
    responses(
        (status = 200, description = "Registered agents", body = Vec<AgentResponse>),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Conversation"
)]
pub async fn list_agents(State(state): State<AppState>) -> Json<Vec<AgentResponse>> {
    let agents = state.manager.list_agents().await;
    Json(agents.into_iter().map(AgentResponse::from).collect())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/conversation/process", post(process))
        .route("/api/conversation/agents", get(list_agents))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    use hearth::{ChatError, ConfigEntry};

    use crate::adapters::InMemoryRegistry;
    use crate::application::testing::{populated_registry, MockChat};
    use crate::application::{setup_entry, AgentManager};
    use crate::routes::app;
    use crate::routes::testing::{get, json_body, post_json, state};

    async fn manager_with(chat: MockChat) -> AgentManager {
        let manager = AgentManager::new("en");
        setup_entry(
            ConfigEntry::new("Google Generative AI Conversation").with_entry_id("entry-1"),
            Arc::new(chat),
            Arc::new(populated_registry().await),
            &manager,
            "Test Home",
        )
        .await
        .unwrap();
        manager
    }

    #[tokio::test]
    async fn test_process_returns_speech() {
        let app = app(state(manager_with(MockChat::replying(&["Hi there!"])).await, None));

        let response = app
            .oneshot(post_json("/api/conversation/process", json!({"text": "hello"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["response"]["speech"]["plain"]["speech"], "Hi there!");
        assert_eq!(body["response"]["response_type"], "action_done");
        assert_eq!(body["response"]["language"], "en");
        assert!(body["conversation_id"].is_string());
    }

    #[tokio::test]
    async fn test_process_reports_chat_errors_in_body() {
        let chat = MockChat::failing(ChatError::client(None, "some error"));
        let app = app(state(manager_with(chat).await, None));

        let response = app
            .oneshot(post_json(
                "/api/conversation/process",
                json!({
                    "text": "hello",
                    "agent_id": "conversation.google_generative_ai_conversation",
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["response"]["response_type"], "error");
        assert_eq!(body["response"]["data"]["code"], "unknown");
        assert_eq!(
            body["response"]["speech"]["plain"]["speech"],
            "Sorry, I had a problem talking to Google Generative AI: None some error"
        );
    }

    #[tokio::test]
    async fn test_process_unknown_agent() {
        let app = app(state(AgentManager::new("en"), None));

        let response = app
            .oneshot(post_json(
                "/api/conversation/process",
                json!({"text": "hello", "agent_id": "missing"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_agents() {
        let manager = AgentManager::new("en");
        setup_entry(
            ConfigEntry::new("Kitchen").with_entry_id("k"),
            Arc::new(MockChat::replying(&["x"])),
            Arc::new(InMemoryRegistry::new()),
            &manager,
            "Test Home",
        )
        .await
        .unwrap();
        let app = app(state(manager, None));

        let response = app.oneshot(get("/api/conversation/agents")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([{
                "id": "k",
                "entity_id": "conversation.kitchen",
                "name": "Kitchen",
                "supported_languages": "*",
            }])
        );
    }
}
