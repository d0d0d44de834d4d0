//! Single-shot chat-completion invocation.

use crate::extractor::config::ExtractorConfig;
use crate::extractor::error::{ExtractError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Completion backend for the extraction pipeline
///
/// A trait seam so tests can script model output without a network; the
/// contract is one request, no retries.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one prompt and return the raw completion text
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Get the model identifier used by this client
    fn model_name(&self) -> &str;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat-completion client
pub struct ChatModelClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatModelClient {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ExtractError::ClientBuild)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionClient for ChatModelClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!("Sending completion request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(ExtractError::ModelRequest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown error".into());
            return Err(ExtractError::ModelTransport { status, body });
        }

        let parsed: ChatResponse = response.json().await.map_err(ExtractError::ModelRequest)?;

        // An empty choice list or null content falls through to the
        // parser's fallback record rather than failing the call.
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        debug!("Received {} bytes of completion text", text.len());

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
