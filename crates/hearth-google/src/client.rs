//! Google Generative AI client
//!
//! Stateless: every call sends the full chat history.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

use hearth::{ChatError, ChatReply, ChatRequest, GenerativeChat, ModelInfo};

use crate::config::GoogleConfig;
use crate::wire::{
    Content, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, WireModel,
};

/// Header carrying the API key, kept out of request URLs
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Finish reasons that still carry a usable answer
const ACCEPTED_FINISH_REASONS: [&str; 3] = ["FINISH_REASON_UNSPECIFIED", "STOP", "MAX_TOKENS"];

/// HTTP client for the Generative Language API
#[derive(Clone)]
pub struct GoogleGenerativeClient {
    client: Client,
    config: GoogleConfig,
}

impl GoogleGenerativeClient {
    pub fn new(config: GoogleConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChatError::client(None, format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url, self.config.api_version, resource
        )
    }
}

/// `gemini-pro` and `models/gemini-pro` name the same model
fn model_resource(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[async_trait]
impl GenerativeChat for GoogleGenerativeClient {
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        let url = format!(
            "{}:generateContent",
            self.endpoint(&model_resource(&request.model))
        );

        let mut contents: Vec<Content> = request.history.iter().map(Content::from).collect();
        contents.push(Content::from(&hearth::ChatContent::user(request.message.clone())));

        let body = GenerateContentRequest {
            contents,
            generation_config: (&request.generation_config).into(),
        };

        debug!(
            model = %request.model,
            history_len = request.history.len(),
            "Sending message to Google Generative AI"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)
            .inspect_err(|e| error!(error = %e, "Google Generative AI request failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            let err = map_http_error(status, body);
            error!(status = %status, error = %err, "Google Generative AI returned an error");
            return Err(err);
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                ChatError::InvalidResponse(format!("Invalid response body: {}", e.without_url()))
            })?;

        let reply = into_reply(payload)?;
        debug!(parts = reply.parts.len(), "Received reply");
        Ok(reply)
    }

    async fn get_model(&self, model: &str) -> Result<ModelInfo, ChatError> {
        let url = self.endpoint(&model_resource(model));
        debug!(model = %model, "Fetching model");

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.config.api_key.as_str())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, body));
        }

        let model: WireModel = response
            .json()
            .await
            .map_err(|e| {
                ChatError::InvalidResponse(format!("Invalid model body: {}", e.without_url()))
            })?;

        Ok(model.into())
    }

    fn provider_name(&self) -> &str {
        "google"
    }
}

fn into_reply(payload: GenerateContentResponse) -> Result<ChatReply, ChatError> {
    let Some(candidate) = payload.candidates.into_iter().next() else {
        if let Some(reason) = payload.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ChatError::BlockedPrompt(reason));
        }
        return Ok(ChatReply::default());
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if !ACCEPTED_FINISH_REASONS.contains(&reason) {
            return Err(ChatError::StopCandidate(reason.to_string()));
        }
    }

    let parts = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    Ok(ChatReply::new(parts))
}

/// reqwest errors print the request URL; drop it before the text travels further
fn transport_error(e: reqwest::Error) -> ChatError {
    ChatError::client(None, e.without_url().to_string())
}

fn map_http_error(status: StatusCode, body: String) -> ChatError {
    let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => {
            let reasons: Vec<String> = envelope
                .error
                .details
                .into_iter()
                .filter_map(|d| d.reason)
                .collect();
            if reasons.is_empty() {
                envelope.error.message
            } else {
                format!("{} [{}]", envelope.error.message, reasons.join(", "))
            }
        }
        Err(_) => body,
    };

    ChatError::client(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth::{ChatContent, GenerationConfig};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-pro:generateContent";

    fn client_for(server: &MockServer) -> GoogleGenerativeClient {
        GoogleGenerativeClient::new(GoogleConfig::new("test-key").with_base_url(server.uri()))
            .unwrap()
    }

    fn chat_request(model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            generation_config: GenerationConfig {
                temperature: 0.5,
                top_p: 1.0,
                top_k: 1,
                max_output_tokens: 150,
            },
            history: vec![ChatContent::user("You are a home."), ChatContent::model("Ok")],
            message: "hello".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_message_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header(API_KEY_HEADER, "test-key"))
            .and(body_partial_json(json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "You are a home."}]},
                    {"role": "model", "parts": [{"text": "Ok"}]},
                    {"role": "user", "parts": [{"text": "hello"}]},
                ],
                "generationConfig": {
                    "temperature": 0.5,
                    "topP": 1.0,
                    "topK": 1,
                    "maxOutputTokens": 150,
                },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Hi "}, {"text": "there!"}]},
                    "finishReason": "STOP",
                }],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap();

        assert_eq!(reply.parts, vec!["Hi ".to_string(), "there!".to_string()]);
        assert_eq!(reply.text(), "Hi there!");
    }

    #[tokio::test]
    async fn test_bare_model_name_is_prefixed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"content": {"parts": [{"text": "ok"}]}}],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .send_message(&chat_request("gemini-pro"))
            .await
            .unwrap();
        assert_eq!(reply.text(), "ok");
    }

    #[tokio::test]
    async fn test_http_error_is_client_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT",
                    "details": [{
                        "@type": "type.googleapis.com/google.rpc.ErrorInfo",
                        "reason": "API_KEY_INVALID",
                    }],
                },
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap_err();

        assert!(err.is_invalid_api_key());
        assert_eq!(
            err.to_string(),
            "400 API key not valid. Please pass a valid API key. [API_KEY_INVALID]"
        );
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap_err();

        assert_eq!(err, ChatError::client(Some(503), "upstream unavailable"));
    }

    #[tokio::test]
    async fn test_blocked_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": {"blockReason": "SAFETY"},
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap_err();

        assert_eq!(err, ChatError::BlockedPrompt("SAFETY".into()));
    }

    #[tokio::test]
    async fn test_stopped_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{"finishReason": "SAFETY"}],
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap_err();

        assert_eq!(err, ChatError::StopCandidate("SAFETY".into()));
    }

    #[tokio::test]
    async fn test_no_candidates_is_empty_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let reply = client_for(&server)
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap();

        assert!(reply.is_empty());
    }

    #[tokio::test]
    async fn test_connection_failure_has_no_status() {
        let client =
            GoogleGenerativeClient::new(GoogleConfig::new("k").with_base_url("http://127.0.0.1:1"))
                .unwrap();

        let err = client
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Client { status: None, .. }));
        assert!(err.to_string().starts_with("None "));
    }

    #[tokio::test]
    async fn test_transport_errors_never_carry_the_key() {
        let key = "SUPER-SECRET-KEY";
        let client =
            GoogleGenerativeClient::new(GoogleConfig::new(key).with_base_url("http://127.0.0.1:1"))
                .unwrap();

        let err = client
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap_err();
        assert!(!err.to_string().contains(key), "{}", err);
        assert!(!format!("{:?}", err).contains(key));

        let err = client.get_model("gemini-pro").await.unwrap_err();
        assert!(!err.to_string().contains(key), "{}", err);
    }

    #[tokio::test]
    async fn test_key_is_not_sent_in_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&chat_request("models/gemini-pro"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::InvalidResponse(_)));
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_get_model() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/models/gemini-pro"))
            .and(header(API_KEY_HEADER, "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "models/gemini-pro",
                "displayName": "Gemini 1.0 Pro",
                "inputTokenLimit": 30720,
                "outputTokenLimit": 2048,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let model = client_for(&server).get_model("models/gemini-pro").await.unwrap();

        assert_eq!(model.name, "models/gemini-pro");
        assert_eq!(model.display_name.as_deref(), Some("Gemini 1.0 Pro"));
        assert_eq!(model.output_token_limit, Some(2048));
    }

    #[tokio::test]
    async fn test_get_model_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/models/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": 404, "message": "models/missing is not found"},
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).get_model("missing").await.unwrap_err();
        assert_eq!(err, ChatError::client(Some(404), "models/missing is not found"));
    }
}
