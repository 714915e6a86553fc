use super::{ModelCallError, ModelClient};
use crate::config::{ConfigResult, ConfigurationError, ModelConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// Trimmed text of the first choice, empty when the provider sent none
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default()
    }
}

/// Single-attempt client for an OpenAI-compatible chat-completions endpoint.
///
/// Wrap it in [`super::RetryingClient`] to get the retry budget.
#[derive(Clone)]
pub struct OpenRouterClient {
    client: Client,
    config: ModelConfig,
}

impl std::fmt::Debug for OpenRouterClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("api_key_env", &self.config.api_key_env)
            .finish()
    }
}

impl OpenRouterClient {
    pub fn new(config: ModelConfig) -> ConfigResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(format!("sidequest-core/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ConfigurationError::invalid_value(
                    "model.endpoint",
                    &config.endpoint,
                    &format!("failed to create HTTP client: {e}"),
                )
            })?;

        info!(
            endpoint = %config.endpoint,
            model = %config.model,
            timeout_seconds = config.request_timeout_seconds,
            "Created model client"
        );

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn api_key(&self) -> Result<String, ModelCallError> {
        std::env::var(&self.config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ModelCallError::MissingApiKey(self.config.api_key_env.clone()))
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelCallError> {
        let api_key = self.api_key()?;
        let request = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelCallError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.json::<ChatResponse>().await?.into_text();
        debug!(response_chars = text.len(), "Received model response");

        if text.is_empty() {
            return Err(ModelCallError::EmptyContent);
        }
        Ok(text)
    }
}
