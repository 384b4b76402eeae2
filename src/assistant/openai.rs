//! OpenAI-compatible chat completions client.

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Assistant, AssistantError, Framing};
use crate::config::AssistantConfig;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

/// Client for `POST {base_url}/chat/completions`.
pub struct OpenAiClient {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl OpenAiClient {
    pub fn new(config: AssistantConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("aquaworld/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// One completion round-trip.
    pub async fn try_complete(&self, query: &str, framing: Framing) -> Result<String, AssistantError> {
        let api_key = self.config.api_key.as_deref().ok_or(AssistantError::Disabled)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage { role: "system", content: framing.system_prompt() },
                ChatMessage { role: "user", content: query },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        debug!("Sending completion request to {} ({:?} framing)", url, framing);

        // Error statuses still carry a JSON body; it is judged by shape below.
        let body = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .text()
            .await?;

        let value: Value = serde_json::from_str(&body).map_err(AssistantError::Unparseable)?;
        extract_completion(&value).ok_or(AssistantError::UnrecognizedShape)
    }
}

/// `choices[0].message.content`, else legacy `choices[0].text`.
fn extract_completion(value: &Value) -> Option<String> {
    let choice = value.get("choices")?.get(0)?;
    choice
        .get("message")
        .and_then(|m| m.get("content"))
        .and_then(Value::as_str)
        .or_else(|| choice.get("text").and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl Assistant for OpenAiClient {
    async fn complete(&self, query: &str, framing: Framing) -> String {
        match self.try_complete(query, framing).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Assistant completion failed: {}", e);
                e.fallback_text().to_string()
            }
        }
    }
}
