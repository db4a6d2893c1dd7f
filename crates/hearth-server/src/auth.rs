//! Simple API Token Authentication (Bearer Token)

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

pub const API_TOKEN_ENV: &str = "HEARTH_API_TOKEN";

/// Expected bearer token; `None` disables authentication
#[derive(Clone, Default)]
pub struct ApiToken(Option<Arc<str>>);

impl ApiToken {
    pub fn new(token: Option<String>) -> Self {
        Self(token.filter(|t| !t.is_empty()).map(Arc::from))
    }

    /// Read `HEARTH_API_TOKEN`
    pub fn from_env() -> Self {
        Self::new(std::env::var(API_TOKEN_ENV).ok())
    }

    pub fn is_enabled(&self) -> bool {
        self.0.is_some()
    }
}

/// Authentication middleware
/// Validates Bearer token against the configured API token
pub async fn auth_middleware(
    State(token): State<ApiToken>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let expected = match &token.0 {
        Some(expected) => expected,
        // No token configured = auth disabled (for development)
        None => return Ok(next.run(request).await),
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match auth_header.and_then(|h| h.strip_prefix("Bearer ")) {
        Some(provided) if provided == &**expected => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!("Invalid API token attempted");
            Err(StatusCode::UNAUTHORIZED)
        }
        None => {
            tracing::warn!("Missing or malformed Authorization header");
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
