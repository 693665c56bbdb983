//! Service configuration loaded from environment variables

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// MongoDB connection string
    #[serde(default = "default_mongodb_uri")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[serde(default = "default_mongodb_db")]
    pub mongodb_db: String,

    /// AI agent configuration
    #[serde(default)]
    pub agent: AgentConfig,
}

/// AI provider and dispatch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Direct DeepSeek API credential
    #[serde(default)]
    pub deepseek_api_key: Option<SecretString>,

    /// OpenRouter gateway credential
    #[serde(default)]
    pub openrouter_api_key: Option<SecretString>,

    /// Direct DeepSeek API base URL
    #[serde(default = "default_deepseek_base_url")]
    pub deepseek_base_url: String,

    /// OpenRouter gateway base URL
    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,

    /// Model identifier for the direct API
    #[serde(default = "default_deepseek_model")]
    pub deepseek_model: String,

    /// Model identifier for the gateway (vendor-prefixed)
    #[serde(default = "default_openrouter_model")]
    pub openrouter_model: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Number of retry attempts for transient failures
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,

    /// Base backoff in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Default sampling temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default response-length cap in tokens
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

// Default value functions
fn default_port() -> u16 { 3000 }
fn default_mongodb_uri() -> String { "mongodb://localhost:27017".to_string() }
fn default_mongodb_db() -> String { "lvl-ai".to_string() }
fn default_deepseek_base_url() -> String { "https://api.deepseek.com".to_string() }
fn default_openrouter_base_url() -> String { "https://openrouter.ai/api/v1".to_string() }
fn default_deepseek_model() -> String { "deepseek-chat".to_string() }
fn default_openrouter_model() -> String { "deepseek/deepseek-chat".to_string() }
fn default_timeout_ms() -> u64 { 30000 }
fn default_retry_attempts() -> usize { 2 }
fn default_retry_backoff_ms() -> u64 { 200 }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 1000 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            mongodb_uri: default_mongodb_uri(),
            mongodb_db: default_mongodb_db(),
            agent: AgentConfig::default(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            deepseek_api_key: None,
            openrouter_api_key: None,
            deepseek_base_url: default_deepseek_base_url(),
            openrouter_base_url: default_openrouter_base_url(),
            deepseek_model: default_deepseek_model(),
            openrouter_model: default_openrouter_model(),
            timeout_ms: default_timeout_ms(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("PORT") {
            if let Ok(port) = val.parse() {
                self.port = port;
            }
        }

        if let Ok(val) = std::env::var("MONGODB_URI") {
            self.mongodb_uri = val;
        }

        if let Ok(val) = std::env::var("MONGODB_DB") {
            self.mongodb_db = val;
        }

        self.agent = self.agent.from_env();
        self
    }
}

impl AgentConfig {
    /// Load configuration from environment variables
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("DEEPSEEK_API_KEY") {
            if !val.is_empty() {
                self.deepseek_api_key = Some(SecretString::new(val));
            }
        }

        if let Ok(val) = std::env::var("OPENROUTER_API_KEY") {
            if !val.is_empty() {
                self.openrouter_api_key = Some(SecretString::new(val));
            }
        }

        if let Ok(val) = std::env::var("DEEPSEEK_BASE_URL") {
            self.deepseek_base_url = val;
        }

        if let Ok(val) = std::env::var("OPENROUTER_BASE_URL") {
            self.openrouter_base_url = val;
        }

        if let Ok(val) = std::env::var("DEEPSEEK_MODEL") {
            self.deepseek_model = val;
        }

        if let Ok(val) = std::env::var("OPENROUTER_MODEL") {
            self.openrouter_model = val;
        }

        if let Ok(val) = std::env::var("AGENT_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }

        if let Ok(val) = std::env::var("AGENT_MAX_RETRIES") {
            if let Ok(retries) = val.parse() {
                self.retry_attempts = retries;
            }
        }

        if let Ok(val) = std::env::var("AGENT_RETRY_BACKOFF_MS") {
            if let Ok(ms) = val.parse() {
                self.retry_backoff_ms = ms;
            }
        }

        if let Ok(val) = std::env::var("AGENT_DEFAULT_TEMPERATURE") {
            if let Ok(temperature) = val.parse() {
                self.default_temperature = temperature;
            }
        }

        if let Ok(val) = std::env::var("AGENT_MAX_TOKENS") {
            if let Ok(max_tokens) = val.parse() {
                self.default_max_tokens = max_tokens;
            }
        }

        self
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get retry backoff as Duration
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}
