//! Hearth API Routes
//!
//! - /health - Liveness
//! - /api/conversation - Conversation agents
//! - /api/llm - LLM tool APIs

use axum::{http::StatusCode, middleware, routing::get, Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use hearth::DomainError;

use crate::auth;
use crate::AppState;

pub mod conversation;
pub mod llm;
pub mod swagger;

/// Error body returned by handlers
pub type ApiError = (StatusCode, String);

/// Map a domain error to an HTTP status
pub fn error_response(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    }
    (status, err.to_string())
}

#[derive(Serialize, ToSchema)]
pub struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Server is running", body = HealthCheck)),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Hearth API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full application router
pub fn app(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(conversation::router())
        .merge(llm::router())
        .layer(middleware::from_fn_with_state(
            state.token.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", swagger::ApiDoc::openapi()))
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::testing::{get, json_body, state};
    use super::*;
    use crate::application::AgentManager;
    use axum::http::header;
    use tower::ServiceExt;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            error_response(DomainError::not_found("agent", "x")).0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(DomainError::Validation("bad".into())).0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(DomainError::Conflict("dup".into())).0,
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_response(DomainError::NotReady("later".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let app = app(state(AgentManager::new("en"), Some("s3cret")));
        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_api_requires_token() {
        let app = app(state(AgentManager::new("en"), Some("s3cret")));

        let response = app
            .clone()
            .oneshot(get("/api/conversation/agents"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let mut request = get("/api/conversation/agents");
        request.headers_mut().insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_static("Bearer s3cret"),
        );
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let app = app(state(AgentManager::new("en"), None));
        let response = app.oneshot(get("/api-docs/openapi.json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let doc = json_body(response).await;
        assert!(doc["paths"]["/api/conversation/process"].is_object());
        assert!(doc["paths"]["/api/llm/apis/{api_id}/tools/{tool_name}"].is_object());
    }
}
