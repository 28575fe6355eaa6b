// OpenAI-compatible REST client.
//
// Implements both core ports that talk to the provider:
// - `AiProvider` via `POST {base}/chat/completions`
// - `ModerationProvider` via `POST {base}/moderations`

use crate::core::ai::{AiConfig, AiError, AiMessage, AiProvider, AiProviderResponse};
use crate::core::moderation::{
    ModerationProvider, ModerationProviderError, RemoteModerationResult,
};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, thiserror::Error)]
pub enum ClientBuildError {
    #[error("API key is not a valid header value")]
    InvalidApiKey,
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    moderation_timeout: Duration,
}

impl OpenAiClient {
    pub fn new(
        api_key: &str,
        base_url: impl Into<String>,
        request_timeout: Duration,
        moderation_timeout: Duration,
    ) -> Result<Self, ClientBuildError> {
        let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| ClientBuildError::InvalidApiKey)?;
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            moderation_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModerationResponse {
    results: Vec<RemoteModerationResult>,
}

#[async_trait]
impl AiProvider for OpenAiClient {
    async fn chat_complete(
        &self,
        messages: &[AiMessage],
        config: &AiConfig,
    ) -> Result<AiProviderResponse, AiError> {
        let payload = json!({
            "model": config.model,
            "messages": messages,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
        });

        let response = self
            .client
            .post(self.url("chat/completions"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Provider { status, body });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        // Missing content becomes an empty string, which analysis parsing rejects
        let content = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::MalformedResponse("no choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        tracing::debug!("Chat completion received: {} chars", content.len());

        Ok(AiProviderResponse { content })
    }
}

#[async_trait]
impl ModerationProvider for OpenAiClient {
    async fn moderate(&self, text: &str) -> Result<RemoteModerationResult, ModerationProviderError> {
        let response = self
            .client
            .post(self.url("moderations"))
            .timeout(self.moderation_timeout)
            .json(&json!({ "input": text }))
            .send()
            .await
            .map_err(|e| ModerationProviderError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModerationProviderError::Provider { status, body });
        }

        let moderation: ModerationResponse = response
            .json()
            .await
            .map_err(|e| ModerationProviderError::MalformedResponse(e.to_string()))?;

        moderation.results.into_iter().next().ok_or_else(|| {
            ModerationProviderError::MalformedResponse("no results in response".to_string())
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
