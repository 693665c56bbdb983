//! Agent facade: the user-facing organizer operations
//!
//! Every operation rebuilds context from the store, formats it, merges it
//! into a fixed prompt template, and dispatches. Nothing is cached; calls
//! for different users are fully independent.

use super::dispatcher::{AskOptions, FailurePolicy, ModelDispatcher};
use super::prompts;
use super::provider::{Provider, ProviderRegistry};
use crate::context::{format_context_for_prompt, ContextBuilder, RetrievedContext};
use crate::error::Result;
use crate::store::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Per-call options accepted by the chat operation
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub provider: Option<Provider>,
}

/// Outcome of a provider connectivity probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProbe {
    pub provider: Provider,
    pub status: ProbeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Connected,
    Error,
}

/// The organizer agent
pub struct OrganizerAgent {
    context: ContextBuilder,
    dispatcher: ModelDispatcher,
}

impl OrganizerAgent {
    pub fn new(store: Arc<dyn Store>, dispatcher: ModelDispatcher) -> Self {
        Self {
            context: ContextBuilder::new(store),
            dispatcher,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        self.dispatcher.registry()
    }

    /// Conversational turn with the organizer.
    ///
    /// Dispatch failures resolve to a fixed apology string instead of an
    /// error; context-build and provider-selection failures still propagate.
    pub async fn chat(
        &self,
        user_id: &str,
        message: &str,
        options: &ChatOptions,
    ) -> Result<String> {
        self.chat_with_policy(
            user_id,
            message,
            options,
            FailurePolicy::Fallback(prompts::CHAT_FALLBACK),
        )
        .await
    }

    /// Task organization suggestions for the user's current task set
    pub async fn organization_suggestions(
        &self,
        user_id: &str,
        provider: Option<Provider>,
    ) -> Result<String> {
        self.insight(user_id, prompts::SUGGESTIONS_PROMPT, 0.6, provider)
            .await
    }

    /// An ordered plan for today
    pub async fn daily_plan(&self, user_id: &str, provider: Option<Provider>) -> Result<String> {
        self.insight(user_id, prompts::DAILY_PLAN_PROMPT, 0.6, provider)
            .await
    }

    /// Pattern insights over the user's completion habits
    pub async fn productivity_analysis(
        &self,
        user_id: &str,
        provider: Option<Provider>,
    ) -> Result<String> {
        self.insight(user_id, prompts::PRODUCTIVITY_PROMPT, 0.7, provider)
            .await
    }

    /// An encouraging message grounded in the user's progress
    pub async fn motivation(&self, user_id: &str, provider: Option<Provider>) -> Result<String> {
        self.insight(user_id, prompts::MOTIVATION_PROMPT, 0.8, provider)
            .await
    }

    /// Retrieve the raw context, for diagnostics and the context endpoint
    pub async fn retrieve_context(&self, user_id: &str) -> Result<RetrievedContext> {
        self.context.retrieve_complete_context(user_id).await
    }

    /// Break a free-form goal into task suggestions. Needs no stored
    /// context; serves the same conversational UI path as chat.
    pub async fn task_suggestions_for_goal(
        &self,
        user_input: &str,
        options: &ChatOptions,
    ) -> Result<String> {
        self.dispatcher
            .ask(
                prompts::TASK_SUGGESTIONS_SYSTEM_PROMPT,
                user_input,
                &Self::ask_options(options),
                FailurePolicy::Fallback(prompts::CHAT_FALLBACK),
            )
            .await
    }

    /// Analyze a single task description
    pub async fn analyze_task(
        &self,
        task_description: &str,
        options: &ChatOptions,
    ) -> Result<String> {
        self.dispatcher
            .ask(
                prompts::TASK_ANALYSIS_SYSTEM_PROMPT,
                task_description,
                &Self::ask_options(options),
                FailurePolicy::Fallback(prompts::CHAT_FALLBACK),
            )
            .await
    }

    /// Short motivational message for a task type
    pub async fn motivational_message_for(
        &self,
        task_type: &str,
        options: &ChatOptions,
    ) -> Result<String> {
        let message = format!(
            "Generate a motivational message for someone working on: {}",
            task_type
        );
        self.dispatcher
            .ask(
                prompts::MOTIVATIONAL_SYSTEM_PROMPT,
                &message,
                &Self::ask_options(options),
                FailurePolicy::Fallback(prompts::CHAT_FALLBACK),
            )
            .await
    }

    /// Probe provider connectivity. Operational diagnostics only; dispatch
    /// failures are reported in the probe result, not raised.
    pub async fn test_provider(&self, provider: Option<Provider>) -> Result<ProviderProbe> {
        let selected = match provider {
            Some(provider) => provider,
            None => self.registry().preferred()?,
        };

        let options = AskOptions {
            provider: Some(selected),
            ..AskOptions::default()
        };

        match self
            .dispatcher
            .ask(
                prompts::PROBE_SYSTEM_PROMPT,
                &prompts::probe_message(selected),
                &options,
                FailurePolicy::Propagate,
            )
            .await
        {
            Ok(response) => Ok(ProviderProbe {
                provider: selected,
                status: ProbeStatus::Connected,
                response: Some(response),
            }),
            Err(e) => Ok(ProviderProbe {
                provider: selected,
                status: ProbeStatus::Error,
                response: Some(e.to_string()),
            }),
        }
    }

    /// Context-grounded dispatch with propagation; shared by the insight
    /// operations.
    async fn insight(
        &self,
        user_id: &str,
        prompt: &str,
        temperature: f32,
        provider: Option<Provider>,
    ) -> Result<String> {
        let options = ChatOptions {
            temperature: Some(temperature),
            max_tokens: None,
            provider,
        };
        self.chat_with_policy(user_id, prompt, &options, FailurePolicy::Propagate)
            .await
    }

    async fn chat_with_policy(
        &self,
        user_id: &str,
        message: &str,
        options: &ChatOptions,
        policy: FailurePolicy,
    ) -> Result<String> {
        let context = self.context.retrieve_complete_context(user_id).await?;
        let formatted = format_context_for_prompt(&context);
        let system_prompt = prompts::organizer_system_prompt(&formatted);

        let response = self
            .dispatcher
            .ask(&system_prompt, message, &Self::ask_options(options), policy)
            .await?;

        info!("Organizer response ready for user {}", user_id);
        Ok(response)
    }

    fn ask_options(options: &ChatOptions) -> AskOptions {
        AskOptions {
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            provider: options.provider,
        }
    }
}
