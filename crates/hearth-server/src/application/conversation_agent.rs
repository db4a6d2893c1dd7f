//! Google Generative AI Conversation Agent (Use Case)
//!
//! Renders the configured prompt over the home registry, forwards the
//! sentence to the chat backend and turns the outcome into an intent
//! response. Chat history is kept per conversation id.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, error};
use ulid::Ulid;

use hearth::{
    ChatContent, ChatRequest, ChatRole, ConfigEntry, ConversationAgent, ConversationInput,
    ConversationResult, DomainError, GenerationConfig, GenerativeChat, HomeRegistry,
    IntentResponse, IntentResponseErrorCode, PromptTemplate, SupportedLanguages,
};

const ERROR_TEMPLATE: &str = "Sorry, I had a problem with my template";
const ERROR_TALKING: &str = "Sorry, I had a problem talking to Google Generative AI";
const PROMPT_ACK: &str = "Ok";

/// Conversation agent backed by a generative chat model
pub struct GoogleConversationAgent<C: GenerativeChat, R: HomeRegistry> {
    entry: ConfigEntry,
    chat: Arc<C>,
    registry: Arc<R>,
    location_name: String,
    history: Mutex<HashMap<String, Vec<ChatContent>>>,
    /// Turns on the same conversation run one at a time so none is lost
    turns: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<C: GenerativeChat, R: HomeRegistry> GoogleConversationAgent<C, R> {
    pub fn new(
        entry: ConfigEntry,
        chat: Arc<C>,
        registry: Arc<R>,
        location_name: impl Into<String>,
    ) -> Self {
        Self {
            entry,
            chat,
            registry,
            location_name: location_name.into(),
            history: Mutex::new(HashMap::new()),
            turns: Mutex::new(HashMap::new()),
        }
    }

    /// Stored history of a conversation
    #[cfg(test)]
    pub async fn history(&self, conversation_id: &str) -> Option<Vec<ChatContent>> {
        self.history.lock().await.get(conversation_id).cloned()
    }

    fn generation_config(&self) -> GenerationConfig {
        let options = &self.entry.options;
        GenerationConfig {
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            max_output_tokens: options.max_tokens,
        }
    }

    async fn generate_prompt(&self) -> Result<String, DomainError> {
        let snapshot = self.registry.snapshot().await?;
        PromptTemplate::new(self.entry.options.prompt.clone()).render(&self.location_name, snapshot)
    }

    /// Hold the turn lock of a known conversation
    async fn lock_turn(&self, conversation_id: Option<&str>) -> Option<OwnedMutexGuard<()>> {
        let id = conversation_id?;
        if !self.history.lock().await.contains_key(id) {
            return None;
        }

        let turn = self
            .turns
            .lock()
            .await
            .entry(id.to_string())
            .or_default()
            .clone();
        Some(turn.lock_owned().await)
    }

    /// Existing conversation, or a fresh id with two placeholder slots for the prompt
    async fn start_or_resume(&self, conversation_id: Option<&str>) -> (String, Vec<ChatContent>) {
        let history = self.history.lock().await;

        if let Some((id, messages)) =
            conversation_id.and_then(|id| history.get(id).map(|m| (id.to_string(), m.clone())))
        {
            return (id, messages);
        }

        (
            Ulid::new().to_string(),
            vec![ChatContent::user(String::new()), ChatContent::model(String::new())],
        )
    }
}

#[async_trait]
impl<C, R> ConversationAgent for GoogleConversationAgent<C, R>
where
    C: GenerativeChat + 'static,
    R: HomeRegistry + 'static,
{
    fn supported_languages(&self) -> SupportedLanguages {
        SupportedLanguages::All
    }

    async fn process(&self, input: ConversationInput) -> ConversationResult {
        let generation_config = self.generation_config();
        debug!(
            model = %self.entry.options.chat_model,
            ?generation_config,
            "Model"
        );

        let _turn = self.lock_turn(input.conversation_id.as_deref()).await;
        let (conversation_id, mut messages) =
            self.start_or_resume(input.conversation_id.as_deref()).await;

        let mut intent_response = IntentResponse::new(input.language.clone());

        let prompt = match self.generate_prompt().await {
            Ok(prompt) => prompt,
            Err(err) => {
                error!(error = %err, "Error rendering prompt");
                let detail = match err {
                    DomainError::Template(message) => message,
                    other => other.to_string(),
                };
                intent_response.set_error(
                    IntentResponseErrorCode::Unknown,
                    format!("{}: {}", ERROR_TEMPLATE, detail),
                );
                return ConversationResult::new(intent_response, Some(conversation_id));
            }
        };

        messages[0] = ChatContent::user(prompt);
        messages[1] = ChatContent::model(PROMPT_ACK);

        debug!(input = %input.text, history = ?messages, "Input");

        let request = ChatRequest {
            model: self.entry.options.chat_model.clone(),
            generation_config,
            history: messages,
            message: input.text,
        };

        let reply = match self.chat.send_message(&request).await {
            Ok(reply) => reply,
            Err(err) => {
                error!(error = %err, "Error sending message");
                intent_response.set_error(
                    IntentResponseErrorCode::Unknown,
                    format!("{}: {}", ERROR_TALKING, err),
                );
                return ConversationResult::new(intent_response, Some(conversation_id));
            }
        };

        debug!(parts = ?reply.parts, "Response");

        if reply.is_empty() {
            intent_response.set_error(
                IntentResponseErrorCode::Unknown,
                format!("{}. Likely blocked", ERROR_TALKING),
            );
            return ConversationResult::new(intent_response, Some(conversation_id));
        }

        let speech = reply.text();

        let mut history = request.history;
        history.push(ChatContent::user(request.message));
        history.push(ChatContent {
            role: ChatRole::Model,
            parts: reply.parts,
        });
        self.history
            .lock()
            .await
            .insert(conversation_id.clone(), history);

        intent_response.set_speech(speech);
        ConversationResult::new(intent_response, Some(conversation_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRegistry;
    use crate::application::testing::{populated_registry, MockChat};
    use hearth::{ChatError, DeviceSpec, IntentResponseType};
    use std::time::Duration;

    fn agent(
        chat: Arc<MockChat>,
        registry: Arc<InMemoryRegistry>,
        entry: ConfigEntry,
    ) -> GoogleConversationAgent<MockChat, InMemoryRegistry> {
        GoogleConversationAgent::new(entry, chat, registry, "Test Home")
    }

    fn speech(result: &ConversationResult) -> String {
        result.response.as_dict()["speech"]["plain"]["speech"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }

    #[tokio::test]
    async fn test_default_prompt() {
        let chat = Arc::new(MockChat::replying(&["Hi there!"]));
        let registry = Arc::new(populated_registry().await);
        let agent = agent(chat.clone(), registry, ConfigEntry::new("Google Generative AI"));

        let result = agent.process(ConversationInput::new("hello", "en")).await;

        assert_eq!(result.response.response_type, IntentResponseType::ActionDone);
        assert_eq!(speech(&result), "Hi there!");

        let requests = chat.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.model, "models/gemini-pro");
        assert_eq!(
            request.generation_config,
            GenerationConfig {
                temperature: 0.9,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 150,
            }
        );
        assert_eq!(request.message, "hello");
        assert_eq!(request.history.len(), 2);
        assert_eq!(request.history[0].role, ChatRole::User);
        assert_eq!(request.history[1], ChatContent::model("Ok"));

        let prompt = request.history[0].text();
        assert!(prompt.starts_with("This smart home is controlled by Test Home."));
        assert!(prompt.contains(
            "Test Area:\n- Test Device (Test Model)\n\n\
             Test Area 2:\n- Test Device 2\n- Test Device 3 (Test Model 3A)\n- Test Device 4\n- 1 (3)"
        ));
        assert!(!prompt.contains("Test Service"));
        assert!(!prompt.contains("Empty Area"));
    }

    #[tokio::test]
    async fn test_error_handling() {
        let chat = Arc::new(MockChat::failing(ChatError::client(None, "some error")));
        let agent = agent(chat, Arc::new(InMemoryRegistry::new()), ConfigEntry::new("t"));

        let result = agent.process(ConversationInput::new("hello", "en")).await;

        assert_eq!(result.response.response_type, IntentResponseType::Error);
        assert_eq!(result.response.error_code, Some(IntentResponseErrorCode::Unknown));
        assert_eq!(
            speech(&result),
            "Sorry, I had a problem talking to Google Generative AI: None some error"
        );
    }

    #[tokio::test]
    async fn test_blocked_response() {
        let chat = Arc::new(MockChat::replying(&[]));
        let agent = agent(chat, Arc::new(InMemoryRegistry::new()), ConfigEntry::new("t"));

        let result = agent.process(ConversationInput::new("hello", "en")).await;

        assert_eq!(result.response.response_type, IntentResponseType::Error);
        assert_eq!(result.response.error_code, Some(IntentResponseErrorCode::Unknown));
        assert_eq!(
            speech(&result),
            "Sorry, I had a problem talking to Google Generative AI. Likely blocked"
        );
        let id = result.conversation_id.unwrap();
        assert!(agent.history(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_template_error() {
        let chat = Arc::new(MockChat::replying(&["unused"]));
        let entry = ConfigEntry::new("t")
            .with_prompt("talk like a {% if True %}smarthome{% else %}pirate please.");
        let agent = agent(chat.clone(), Arc::new(InMemoryRegistry::new()), entry);

        let result = agent.process(ConversationInput::new("hello", "en")).await;

        assert_eq!(result.response.response_type, IntentResponseType::Error);
        assert_eq!(result.response.error_code, Some(IntentResponseErrorCode::Unknown));
        assert!(speech(&result).starts_with("Sorry, I had a problem with my template: "));
        assert!(chat.requests().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_kept_per_conversation() {
        let chat = Arc::new(MockChat::replying(&["Hi there!"]));
        let registry = Arc::new(InMemoryRegistry::new());
        let agent = agent(chat.clone(), registry.clone(), ConfigEntry::new("t"));

        let first = agent.process(ConversationInput::new("hello", "en")).await;
        let conversation_id = first.conversation_id.clone().unwrap();

        registry
            .get_or_create_device(
                "e",
                DeviceSpec::new(("test", "lamp"))
                    .with_name("Kitchen Lamp")
                    .with_suggested_area("Kitchen"),
            )
            .await
            .unwrap();

        let second = agent
            .process(ConversationInput::new("and again", "en").with_conversation_id(&conversation_id))
            .await;
        assert_eq!(second.conversation_id.as_deref(), Some(conversation_id.as_str()));

        let requests = chat.requests();
        assert!(!requests[0].history[0].text().contains("Kitchen Lamp"));
        assert!(requests[1].history[0]
            .text()
            .contains("Kitchen:\n- Kitchen Lamp"));
        assert_eq!(requests[1].history[0].role, ChatRole::User);
        assert_eq!(requests[1].history[1], ChatContent::model("Ok"));
        assert_eq!(requests[1].history.len(), 4);
        assert_eq!(requests[1].history[2], ChatContent::user("hello"));
        assert_eq!(requests[1].history[3], ChatContent::model("Hi there!"));
        assert_eq!(requests[1].message, "and again");

        let history = agent.history(&conversation_id).await.unwrap();
        assert_eq!(history.len(), 6);
    }

    #[tokio::test]
    async fn test_concurrent_turns_keep_every_exchange() {
        let chat = Arc::new(MockChat::replying(&["Hi"]).with_delay(Duration::from_millis(20)));
        let agent = agent(chat.clone(), Arc::new(InMemoryRegistry::new()), ConfigEntry::new("t"));

        let first = agent.process(ConversationInput::new("hello", "en")).await;
        let conversation_id = first.conversation_id.unwrap();

        tokio::join!(
            agent.process(ConversationInput::new("one", "en").with_conversation_id(&conversation_id)),
            agent.process(ConversationInput::new("two", "en").with_conversation_id(&conversation_id)),
        );

        let history = agent.history(&conversation_id).await.unwrap();
        assert_eq!(history.len(), 8);
        let sent: Vec<String> = history.iter().skip(2).step_by(2).map(|c| c.text()).collect();
        assert_eq!(sent.len(), 3);
        assert!(sent.contains(&"one".to_string()) && sent.contains(&"two".to_string()));
        assert_eq!(chat.requests()[2].history.len(), 6);
    }

    #[tokio::test]
    async fn test_unknown_conversation_id_starts_fresh() {
        let chat = Arc::new(MockChat::replying(&["Hi"]));
        let agent = agent(chat.clone(), Arc::new(InMemoryRegistry::new()), ConfigEntry::new("t"));

        let result = agent
            .process(ConversationInput::new("hello", "en").with_conversation_id("unknown"))
            .await;

        assert_ne!(result.conversation_id.as_deref(), Some("unknown"));
        assert_eq!(chat.requests()[0].history.len(), 2);
    }

    #[tokio::test]
    async fn test_conversation_agent_languages() {
        let agent = agent(
            Arc::new(MockChat::replying(&["x"])),
            Arc::new(InMemoryRegistry::new()),
            ConfigEntry::new("t"),
        );
        assert_eq!(agent.supported_languages(), SupportedLanguages::All);
        assert_eq!(serde_json::to_value(agent.supported_languages()).unwrap(), "*");
    }
}
