//! Hearth API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API Client for Hearth
pub struct HearthClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Serialize)]
pub struct ProcessRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessResponse {
    pub response: Value,
    pub conversation_id: Option<String>,
}

impl ProcessResponse {
    /// Plain speech of the intent response
    pub fn speech(&self) -> &str {
        self.response["speech"]["plain"]["speech"]
            .as_str()
            .unwrap_or_default()
    }

    /// Error code when the agent answered with an error
    pub fn error_code(&self) -> Option<&str> {
        if self.response["response_type"] == "error" {
            self.response["data"]["code"].as_str().or(Some("unknown"))
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AgentResponse {
    pub id: String,
    pub entity_id: String,
    pub name: String,
    pub supported_languages: Value,
}

impl HearthClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_token: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.map(str::to_string),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn check(resp: Response) -> Result<Response> {
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }
        Ok(resp)
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Check that the token is accepted by a protected route
    pub async fn verify_token(&self) -> Result<()> {
        self.list_agents().await.map(|_| ())
    }

    /// Send one sentence to a conversation agent
    pub async fn process(&self, request: &ProcessRequest<'_>) -> Result<ProcessResponse> {
        let url = format!("{}/api/conversation/process", self.base_url);
        let resp = self
            .authorized(self.client.post(&url).json(request))
            .send()
            .await
            .context("Failed to connect to Hearth API")?;

        let result: ProcessResponse = Self::check(resp)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(result)
    }

    /// List registered agents
    pub async fn list_agents(&self) -> Result<Vec<AgentResponse>> {
        let url = format!("{}/api/conversation/agents", self.base_url);
        let resp = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .context("Failed to connect to Hearth API")?;

        let agents: Vec<AgentResponse> = Self::check(resp)
            .await?
            .json()
            .await
            .context("Failed to parse response")?;

        Ok(agents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_speech_and_error_code() {
        let ok: ProcessResponse = serde_json::from_value(json!({
            "response": {
                "response_type": "action_done",
                "speech": {"plain": {"speech": "Hi there!", "extra_data": null}},
                "data": {"targets": [], "success": [], "failed": []},
            },
            "conversation_id": "01HX",
        }))
        .unwrap();
        assert_eq!(ok.speech(), "Hi there!");
        assert_eq!(ok.error_code(), None);

        let err: ProcessResponse = serde_json::from_value(json!({
            "response": {
                "response_type": "error",
                "speech": {"plain": {"speech": "Sorry", "extra_data": null}},
                "data": {"code": "unknown"},
            },
            "conversation_id": null,
        }))
        .unwrap();
        assert_eq!(err.error_code(), Some("unknown"));
    }

    #[test]
    fn test_request_skips_unset_fields() {
        let request = ProcessRequest {
            text: "hello",
            conversation_id: None,
            language: Some("en"),
            agent_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"text": "hello", "language": "en"})
        );
    }
}
