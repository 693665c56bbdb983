//! AI provider identity and selection

use super::backend::{DeepseekBackend, DispatchError, ModelBackend, OpenrouterBackend};
use crate::config::AgentConfig;
use crate::error::{OrganizerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Which backend services a call. Selected per call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Direct DeepSeek API
    Deepseek,
    /// DeepSeek routed through the OpenRouter gateway
    Openrouter,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deepseek => "deepseek",
            Self::Openrouter => "openrouter",
        }
    }

    /// Human-readable name used in probe messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Deepseek => "DeepSeek",
            Self::Openrouter => "OpenRouter",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backends constructed once at startup and shared across requests. A
/// backend exists only when its credential is configured.
pub struct ProviderRegistry {
    deepseek: Option<Arc<dyn ModelBackend>>,
    openrouter: Option<Arc<dyn ModelBackend>>,
}

impl ProviderRegistry {
    /// Build backends for every configured credential
    pub fn from_config(config: &AgentConfig) -> std::result::Result<Self, DispatchError> {
        let deepseek = match &config.deepseek_api_key {
            Some(key) => Some(
                Arc::new(DeepseekBackend::new(config, key.clone())?) as Arc<dyn ModelBackend>
            ),
            None => None,
        };

        let openrouter = match &config.openrouter_api_key {
            Some(key) => Some(
                Arc::new(OpenrouterBackend::new(config, key.clone())?) as Arc<dyn ModelBackend>
            ),
            None => None,
        };

        Ok(Self { deepseek, openrouter })
    }

    /// Pick the provider to use when the caller does not force one.
    ///
    /// The direct API is preferred; the gateway is a fallback for when only
    /// its credential is present.
    pub fn preferred(&self) -> Result<Provider> {
        if self.deepseek.is_some() {
            Ok(Provider::Deepseek)
        } else if self.openrouter.is_some() {
            Ok(Provider::Openrouter)
        } else {
            Err(OrganizerError::NoProviderConfigured)
        }
    }

    /// Resolve a provider to its backend. An unconfigured provider is a
    /// dispatch-time failure, not a selection-time one: caller overrides are
    /// not validated eagerly.
    pub fn backend(
        &self,
        provider: Provider,
    ) -> std::result::Result<Arc<dyn ModelBackend>, DispatchError> {
        let backend = match provider {
            Provider::Deepseek => &self.deepseek,
            Provider::Openrouter => &self.openrouter,
        };
        backend
            .clone()
            .ok_or(DispatchError::NotConfigured(provider))
    }

    pub fn is_configured(&self, provider: Provider) -> bool {
        match provider {
            Provider::Deepseek => self.deepseek.is_some(),
            Provider::Openrouter => self.openrouter.is_some(),
        }
    }
}
