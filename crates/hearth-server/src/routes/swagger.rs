//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Conversation models
    AgentResponse,
    // LLM models
    LlmApiResponse,
    ProcessRequest,
    ProcessResponse,
    ToolCallRequest,
    ToolResponse,
};

use super::HealthCheck;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::health_check,
        // Conversation endpoints
        super::conversation::process,
        super::conversation::list_agents,
        // LLM endpoints
        super::llm::list_apis,
        super::llm::call_tool,
    ),
    info(
        title = "Hearth API",
        version = "0.1.0",
        description = "Conversation agents backed by Google Generative AI, plus the LLM tool APIs of the home.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Conversation", description = "Conversation - Process sentences with an agent"),
        (name = "LLM", description = "LLM - Tool APIs for language models"),
    ),
    components(
        schemas(
            HealthCheck,
            // Conversation
            ProcessRequest,
            ProcessResponse,
            AgentResponse,
            // LLM
            LlmApiResponse,
            ToolResponse,
            ToolCallRequest,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Bearer token security scheme
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}
