//! OpenAI-compatible chat-completion backends
//!
//! Both providers expose the same chat-completion wire shape; they differ
//! only in base endpoint, credential, and model identifier. The dispatcher
//! is generic over [`ModelBackend`] and never branches on provider identity
//! past construction.

use super::provider::Provider;
use crate::config::AgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Model dispatch error types
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Provider {0} is not configured")]
    NotConfigured(Provider),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Upstream error: status {status}: {message}")]
    UpstreamError { status: u16, message: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DispatchError {
    /// Whether a retry could plausibly succeed. Application-level errors
    /// (auth, bad request, unusable content) are not retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::RequestFailed(_) => true,
            Self::UpstreamError { status, .. } => *status >= 500,
            Self::NotConfigured(_) | Self::InvalidResponse(_) => false,
        }
    }
}

/// A single system+user exchange sent to a backend
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A text-completion backend
#[async_trait]
pub trait ModelBackend: Send + Sync {
    fn provider(&self) -> Provider;

    /// Send one system+user exchange and return the first choice's content.
    async fn complete(&self, request: &ChatRequest) -> Result<String, DispatchError>;
}

/// Shared wire client for the OpenAI-compatible chat-completion shape
struct ChatCompletionClient {
    http: Client,
    base_url: String,
    api_key: SecretString,
    model: String,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    fn new(
        base_url: String,
        api_key: SecretString,
        model: String,
        timeout: Duration,
    ) -> Result<Self, DispatchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DispatchError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            model,
        })
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, DispatchError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = CompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!("Calling chat completion API: model={}", self.model);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout(e.to_string())
                } else {
                    DispatchError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DispatchError::UpstreamError {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| DispatchError::InvalidResponse(e.to_string()))?;

        // Normalize: first choice's content, trimmed; anything empty is a
        // dispatch failure rather than a blank answer shown to the user.
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let content = content.trim();

        if content.is_empty() {
            return Err(DispatchError::InvalidResponse(
                "No response content from AI model".to_string(),
            ));
        }

        Ok(content.to_string())
    }
}

/// Direct DeepSeek API backend
pub struct DeepseekBackend {
    inner: ChatCompletionClient,
}

impl DeepseekBackend {
    pub fn new(config: &AgentConfig, api_key: SecretString) -> Result<Self, DispatchError> {
        Ok(Self {
            inner: ChatCompletionClient::new(
                config.deepseek_base_url.clone(),
                api_key,
                config.deepseek_model.clone(),
                config.timeout(),
            )?,
        })
    }
}

#[async_trait]
impl ModelBackend for DeepseekBackend {
    fn provider(&self) -> Provider {
        Provider::Deepseek
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, DispatchError> {
        self.inner.complete(request).await
    }
}

/// OpenRouter gateway backend, same wire shape with a vendor-prefixed model
pub struct OpenrouterBackend {
    inner: ChatCompletionClient,
}

impl OpenrouterBackend {
    pub fn new(config: &AgentConfig, api_key: SecretString) -> Result<Self, DispatchError> {
        Ok(Self {
            inner: ChatCompletionClient::new(
                config.openrouter_base_url.clone(),
                api_key,
                config.openrouter_model.clone(),
                config.timeout(),
            )?,
        })
    }
}

#[async_trait]
impl ModelBackend for OpenrouterBackend {
    fn provider(&self) -> Provider {
        Provider::Openrouter
    }

    async fn complete(&self, request: &ChatRequest) -> Result<String, DispatchError> {
        self.inner.complete(request).await
    }
}
