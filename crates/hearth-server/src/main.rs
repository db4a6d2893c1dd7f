//! Hearth API Server
//!
//! # Environment Variables
//!
//! - `GOOGLE_API_KEY`: API key for Google Generative AI
//! - `HEARTH_API_TOKEN`: Bearer token for `/api` routes (auth disabled when unset)
//! - `HEARTH_CONFIG`: Path of the TOML config (default `hearth.toml`)
//! - `RUST_LOG`: Log filter (default `info`)

use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hearth::intent::NevermindIntentHandler;
use hearth::{DomainError, IntentRegistry, LlmApiRegistry};
use hearth_google::{GoogleConfig, GoogleGenerativeClient};

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;

use adapters::InMemoryRegistry;
use application::{setup_entry, unload_entry, AgentManager, ListDevicesIntentHandler};
use auth::ApiToken;
use config::ServerConfig;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<AgentManager>,
    pub llm_apis: Arc<LlmApiRegistry>,
    pub token: ApiToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Hearth API initializing...");

    let config = ServerConfig::load()?;

    let registry = Arc::new(match &config.registry_path {
        Some(path) => InMemoryRegistry::load(path)
            .await
            .with_context(|| format!("Failed to load registry {:?}", path))?,
        None => {
            tracing::warn!("No registry_path set - the home has no areas or devices");
            InMemoryRegistry::new()
        }
    });

    let intents = Arc::new(IntentRegistry::new());
    intents.register(Arc::new(NevermindIntentHandler));
    intents.register(Arc::new(ListDevicesIntentHandler::new(registry.clone())));
    let llm_apis = Arc::new(LlmApiRegistry::new(intents));

    let manager = Arc::new(
        AgentManager::new(config.language.clone()).with_default_agent(config.default_agent.clone()),
    );

    match GoogleConfig::from_env() {
        Ok(google) => {
            let chat = Arc::new(
                GoogleGenerativeClient::new(config.google.apply(google))
                    .context("Failed to create Google Generative AI client")?,
            );

            for entry in &config.entries {
                match setup_entry(
                    entry.clone(),
                    chat.clone(),
                    registry.clone(),
                    &manager,
                    &config.location_name,
                )
                .await
                {
                    Ok(entity_id) => tracing::info!(%entity_id, "Conversation agent ready"),
                    Err(DomainError::NotReady(reason)) => {
                        tracing::warn!(entry = %entry.title, %reason, "Conversation agent not ready, skipped")
                    }
                    Err(e) => tracing::error!(entry = %entry.title, error = %e, "Failed to set up conversation agent"),
                }
            }
        }
        Err(e) => {
            tracing::warn!("{} - conversation agents disabled", e);
        }
    }

    let token = ApiToken::from_env();
    if token.is_enabled() {
        tracing::info!("API token authentication enabled");
    } else {
        tracing::warn!("No {} set - authentication disabled", auth::API_TOKEN_ENV);
    }

    let state = AppState {
        manager: manager.clone(),
        llm_apis,
        token,
    };

    let app = routes::app(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Hearth API listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for entry in &config.entries {
        unload_entry(entry, &manager).await;
    }

    tracing::info!("Hearth API shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
