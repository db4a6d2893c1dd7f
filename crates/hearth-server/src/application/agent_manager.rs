//! Agent Manager (Use Case)
//!
//! Keeps the conversation agents registered per config entry and routes
//! conversation turns to them.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use hearth::{
    ConfigEntry, Context, ConversationAgent, ConversationInput, ConversationResult, DomainError,
    SupportedLanguages,
};

/// Public view of a registered agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentInfo {
    /// Config entry id
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub supported_languages: SupportedLanguages,
}

struct RegisteredAgent {
    entry_id: String,
    entity_id: String,
    name: String,
    agent: Arc<dyn ConversationAgent>,
}

impl RegisteredAgent {
    fn matches(&self, agent_id: &str) -> bool {
        self.entry_id == agent_id || self.entity_id == agent_id
    }

    fn info(&self) -> AgentInfo {
        AgentInfo {
            id: self.entry_id.clone(),
            entity_id: self.entity_id.clone(),
            name: self.name.clone(),
            supported_languages: self.agent.supported_languages(),
        }
    }
}

/// Registry of conversation agents
pub struct AgentManager {
    agents: RwLock<Vec<RegisteredAgent>>,
    default_agent: Option<String>,
    language: String,
}

impl AgentManager {
    /// `language` is used for turns that do not name one
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            agents: RwLock::new(Vec::new()),
            default_agent: None,
            language: language.into(),
        }
    }

    /// Agent (entry or entity id) used when a turn does not name one
    pub fn with_default_agent(mut self, agent_id: Option<String>) -> Self {
        self.default_agent = agent_id;
        self
    }

    /// Register an agent for a config entry, replacing any previous one
    pub async fn set_agent(
        &self,
        entry: &ConfigEntry,
        entity_id: impl Into<String>,
        agent: Arc<dyn ConversationAgent>,
    ) {
        let registered = RegisteredAgent {
            entry_id: entry.entry_id.clone(),
            entity_id: entity_id.into(),
            name: entry.title.clone(),
            agent,
        };

        let mut agents = self.agents.write().await;
        if let Some(slot) = agents.iter_mut().find(|a| a.entry_id == entry.entry_id) {
            info!(entry_id = %entry.entry_id, "Replacing conversation agent");
            *slot = registered;
        } else {
            info!(
                entry_id = %entry.entry_id,
                entity_id = %registered.entity_id,
                "Registered conversation agent"
            );
            agents.push(registered);
        }
    }

    /// Remove the agent of a config entry; returns whether one was registered
    pub async fn unset_agent(&self, entry_id: &str) -> bool {
        let mut agents = self.agents.write().await;
        let before = agents.len();
        agents.retain(|a| a.entry_id != entry_id);
        let removed = agents.len() != before;

        if removed {
            info!(entry_id, "Unregistered conversation agent");
        }
        removed
    }

    /// Look up an agent by config entry id or entity id
    pub async fn get_agent(&self, agent_id: &str) -> Option<Arc<dyn ConversationAgent>> {
        self.agents
            .read()
            .await
            .iter()
            .find(|a| a.matches(agent_id))
            .map(|a| a.agent.clone())
    }

    pub async fn list_agents(&self) -> Vec<AgentInfo> {
        self.agents.read().await.iter().map(|a| a.info()).collect()
    }

    /// Process one sentence with the selected agent
    pub async fn converse(
        &self,
        text: impl Into<String>,
        conversation_id: Option<String>,
        context: Option<Context>,
        language: Option<String>,
        agent_id: Option<&str>,
    ) -> Result<ConversationResult, DomainError> {
        let agent = self.resolve(agent_id).await?;
        let language = language.unwrap_or_else(|| self.language.clone());

        if !agent.supported_languages().supports(&language) {
            return Err(DomainError::Validation(format!(
                "Agent does not support language {}",
                language
            )));
        }

        let mut input = ConversationInput::new(text, language);
        input.conversation_id = conversation_id;
        if let Some(context) = context {
            input = input.with_context(context);
        }

        debug!(conversation_id = ?input.conversation_id, language = %input.language, "Processing turn");
        Ok(agent.process(input).await)
    }

    async fn resolve(&self, agent_id: Option<&str>) -> Result<Arc<dyn ConversationAgent>, DomainError> {
        let requested = agent_id.or(self.default_agent.as_deref());

        if let Some(id) = requested {
            return self
                .get_agent(id)
                .await
                .ok_or_else(|| DomainError::not_found("agent", id));
        }

        let agents = self.agents.read().await;
        match agents.as_slice() {
            [only] => Ok(only.agent.clone()),
            [] => Err(DomainError::not_found("agent", "default")),
            _ => {
                warn!(count = agents.len(), "No default agent configured");
                Err(DomainError::Validation(
                    "Several agents are registered; specify agent_id".to_string(),
                ))
            }
        }
    }
}
