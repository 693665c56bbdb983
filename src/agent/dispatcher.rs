//! Model dispatch with bounded retries and per-operation failure policy

use super::backend::{ChatRequest, DispatchError};
use super::provider::{Provider, ProviderRegistry};
use crate::config::AgentConfig;
use crate::error::{OrganizerError, Result};
use crate::metrics::METRICS;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Per-call dispatch options
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Bypasses provider precedence entirely when set
    pub provider: Option<Provider>,
}

/// What to do when dispatch fails after retries.
///
/// The conversational chat path must never dead-end the UI, so it converts
/// failures into a fixed user-safe string; insight operations propagate so
/// the caller's error state can handle them.
#[derive(Debug, Clone, Copy)]
pub enum FailurePolicy {
    Propagate,
    Fallback(&'static str),
}

/// Sends a system+user message pair to the selected backend and normalizes
/// the outcome
pub struct ModelDispatcher {
    registry: Arc<ProviderRegistry>,
    default_temperature: f32,
    default_max_tokens: u32,
    retry_attempts: usize,
    retry_backoff: Duration,
}

impl ModelDispatcher {
    pub fn new(registry: Arc<ProviderRegistry>, config: &AgentConfig) -> Self {
        Self {
            registry,
            default_temperature: config.default_temperature,
            default_max_tokens: config.default_max_tokens,
            retry_attempts: config.retry_attempts,
            retry_backoff: config.retry_backoff(),
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Dispatch one exchange. Selection failures (`NoProviderConfigured`)
    /// always propagate regardless of policy; dispatch failures follow the
    /// supplied policy.
    pub async fn ask(
        &self,
        system_prompt: &str,
        user_message: &str,
        options: &AskOptions,
        policy: FailurePolicy,
    ) -> Result<String> {
        if system_prompt.trim().is_empty() || user_message.trim().is_empty() {
            return Err(OrganizerError::InvalidRequest(
                "Both system prompt and user message are required".to_string(),
            ));
        }

        let provider = match options.provider {
            Some(provider) => provider,
            None => self.registry.preferred()?,
        };
        debug!("Using AI provider: {}", provider);

        match self.dispatch(provider, system_prompt, user_message, options).await {
            Ok(text) => Ok(text),
            Err(e) => match policy {
                FailurePolicy::Propagate => Err(e.into()),
                FailurePolicy::Fallback(fallback) => {
                    warn!("Dispatch to {} failed, returning fallback: {}", provider, e);
                    METRICS.dispatch_fallbacks.inc();
                    Ok(fallback.to_string())
                }
            },
        }
    }

    async fn dispatch(
        &self,
        provider: Provider,
        system_prompt: &str,
        user_message: &str,
        options: &AskOptions,
    ) -> std::result::Result<String, DispatchError> {
        let backend = self.registry.backend(provider)?;

        let request = ChatRequest {
            system_prompt: system_prompt.to_string(),
            user_message: user_message.to_string(),
            temperature: options.temperature.unwrap_or(self.default_temperature),
            max_tokens: options.max_tokens.unwrap_or(self.default_max_tokens),
        };

        let start = Instant::now();

        // Retries are strictly sequential; no concurrent duplicates in flight
        let mut attempt = 0;
        let result = loop {
            attempt += 1;

            match backend.complete(&request).await {
                Ok(text) => break Ok(text),
                Err(e) => {
                    if attempt > self.retry_attempts || !e.is_transient() {
                        break Err(e);
                    }

                    let backoff = self.calculate_backoff(attempt);
                    warn!(
                        "Dispatch attempt {} to {} failed: {}, retrying in {:?}",
                        attempt, provider, e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        };

        METRICS.record_dispatch(provider.as_str(), result.is_ok());
        METRICS
            .dispatch_duration
            .with_label_values(&[provider.as_str()])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    /// Calculate exponential backoff
    fn calculate_backoff(&self, attempt: usize) -> Duration {
        let multiplier = 2_u32.pow((attempt - 1) as u32);
        self.retry_backoff.saturating_mul(multiplier)
    }
}
