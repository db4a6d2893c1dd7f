//! Config Entry Setup (Use Case)
//!
//! Validates a configured model against the chat backend and registers
//! the resulting agent with the manager.

use std::sync::Arc;

use tracing::{info, warn};

use hearth::domain::slugify;
use hearth::{ConfigEntry, DomainError, GenerativeChat, HomeRegistry};

use super::{AgentManager, GoogleConversationAgent};

/// Entity id under which the agent of an entry is exposed
pub fn entity_id_for(entry: &ConfigEntry) -> String {
    format!("conversation.{}", slugify(&entry.title))
}

/// Set up the conversation agent of a config entry.
///
/// Returns the entity id of the registered agent. A rejected API key
/// fails permanently (`SetupFailed`); any other backend error is
/// reported as `NotReady`.
pub async fn setup_entry<C, R>(
    entry: ConfigEntry,
    chat: Arc<C>,
    registry: Arc<R>,
    manager: &AgentManager,
    location_name: &str,
) -> Result<String, DomainError>
where
    C: GenerativeChat + 'static,
    R: HomeRegistry + 'static,
{
    let model = &entry.options.chat_model;

    match chat.get_model(model).await {
        Ok(info) => {
            info!(
                entry_id = %entry.entry_id,
                model = %info.name,
                provider = chat.provider_name(),
                "Model available"
            );
        }
        Err(err) if err.is_invalid_api_key() => {
            warn!(entry_id = %entry.entry_id, error = %err, "Invalid API key");
            return Err(DomainError::SetupFailed(err.to_string()));
        }
        Err(err) => {
            warn!(entry_id = %entry.entry_id, error = %err, "Chat backend not ready");
            return Err(DomainError::NotReady(err.to_string()));
        }
    }

    let entity_id = entity_id_for(&entry);
    let agent = GoogleConversationAgent::new(entry.clone(), chat, registry, location_name);
    manager.set_agent(&entry, entity_id.clone(), Arc::new(agent)).await;

    Ok(entity_id)
}

/// Remove the agent of a config entry
pub async fn unload_entry(entry: &ConfigEntry, manager: &AgentManager) -> bool {
    manager.unset_agent(&entry.entry_id).await
}
