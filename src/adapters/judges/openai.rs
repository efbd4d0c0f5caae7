//! OpenAI-compatible chat-completions judge.
//!
//! Sends a single user message and returns the text of the first choice.
//! No streaming, no retries: one request per scored agent.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::domain::models::JudgeConfig;
use crate::domain::ports::{JudgeError, JudgeModel};

/// Configuration for the chat-completions judge.
#[derive(Debug, Clone)]
pub struct OpenAiJudgeConfig {
    /// API key sent as a bearer token
    pub api_key: String,
    /// API base URL (for proxies and tests)
    pub base_url: String,
    /// Model to use
    pub model: String,
    /// Max tokens to generate
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiJudgeConfig {
    /// Combine the judge section of the config with a resolved API key.
    pub fn from_config(config: &JudgeConfig, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Message role in the chat-completions API.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default)]
    pub content: Option<String>,
}

/// Request body for `/v1/chat/completions`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Response body; only the fields the judge needs.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// Judge backed by an OpenAI-compatible endpoint.
pub struct OpenAiJudge {
    config: OpenAiJudgeConfig,
    client: Client,
}

impl OpenAiJudge {
    pub fn new(config: OpenAiJudgeConfig) -> Result<Self, JudgeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| JudgeError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            messages: vec![ChatMessage {
                role: ChatRole::User,
                content: Some(prompt.to_string()),
            }],
        }
    }
}

#[async_trait]
impl JudgeModel for OpenAiJudge {
    fn model_id(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_chars = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, JudgeError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    JudgeError::Timeout
                } else {
                    JudgeError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(JudgeError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| JudgeError::InvalidBody(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(JudgeError::EmptyCompletion)?;

        debug!(chars = content.len(), "judge replied");
        Ok(content)
    }
}
