//! Configuration management for Chatbridge
//!
//! Parses TOML configuration files and provides typed access to settings.
//! The upstream API credential is usually injected via the `OPENAI_API_KEY`
//! environment variable rather than stored in the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// Upstream completion endpoint configuration
///
/// Fields are private to enforce invariants. Configuration is loaded via
/// deserialization and validated via Config::validate(). After construction,
/// fields cannot be mutated, ensuring validated data remains valid.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_model")]
    model: String,
    /// API credential. Typically absent here and supplied through the
    /// `OPENAI_API_KEY` environment variable at startup. Absence is a
    /// request-time failure, not a startup failure: the server boots and
    /// answers every relay request with a 500 until the key is provided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

impl UpstreamConfig {
    /// Get the upstream API base URL (ends with `/v1`)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model identifier sent with every completion request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the API credential, if one is configured
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-5-mini".to_string()
}

/// System prompt configuration
///
/// The template is an opaque product string. `{user_name}` and `{dimension}`
/// placeholders are interpolated per request; absent request fields fall back
/// to the configured defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PromptConfig {
    #[serde(default = "default_template")]
    template: String,
    #[serde(default = "default_user_name")]
    default_user_name: String,
    #[serde(default = "default_dimension")]
    default_dimension: String,
}

impl PromptConfig {
    /// Get the system prompt template
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Get the fallback user name used when the request omits one
    pub fn default_user_name(&self) -> &str {
        &self.default_user_name
    }

    /// Get the fallback dimension used when the request omits one
    pub fn default_dimension(&self) -> &str {
        &self.default_dimension
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            default_user_name: default_user_name(),
            default_dimension: default_dimension(),
        }
    }
}

fn default_template() -> String {
    "You are a facilitator coach. Your job is to provide deep, meaningful \
     feedback and ask reflective questions. Be direct yet supportive. Use \
     probing questions, summarize patterns, suggest next steps, and avoid \
     generic advice. User name: {user_name}. Dimension/context: {dimension}. \
     Reply in the same language as the user."
        .to_string()
}

fn default_user_name() -> String {
    "Unknown".to_string()
}

fn default_dimension() -> String {
    "None".to_string()
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config.validate().map_err(|e| {
            crate::error::AppError::Config(format!(
                "Invalid configuration in {}: {}",
                path_display, e
            ))
        })?;

        Ok(config)
    }

    /// Apply environment overrides
    ///
    /// `OPENAI_API_KEY` replaces the configured credential and `PORT`
    /// replaces the listen port. Called once at startup, before the
    /// configuration becomes shared read-only state.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY")
            && !key.trim().is_empty()
        {
            self.upstream.api_key = Some(key);
        }
        if let Ok(port) = std::env::var("PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.server.port = p,
                Err(_) => {
                    tracing::warn!(
                        port = %port,
                        "PORT environment variable is not a valid port number, keeping configured value"
                    );
                }
            }
        }
    }

    /// Validate configuration after parsing
    ///
    /// This is called automatically by `from_file()`, but can also be called
    /// explicitly when constructing Config via other means (e.g., in tests).
    pub fn validate(&self) -> crate::error::AppResult<()> {
        // Validate base_url: must start with http:// or https://
        if !self.upstream.base_url.starts_with("http://")
            && !self.upstream.base_url.starts_with("https://")
        {
            return Err(crate::error::AppError::Config(format!(
                "upstream.base_url '{}' must start with 'http://' or 'https://'",
                self.upstream.base_url
            )));
        }

        // Validate base_url: must end with /v1 so the completion path can be
        // appended as '/v1/responses'
        if !self.upstream.base_url.ends_with("/v1") {
            return Err(crate::error::AppError::Config(format!(
                "upstream.base_url '{}' must end with '/v1' (e.g., 'https://api.openai.com/v1')",
                self.upstream.base_url
            )));
        }

        // Validate model: must be non-empty
        if self.upstream.model.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "upstream.model must not be empty".to_string(),
            ));
        }

        // Validate request timeout
        if self.server.request_timeout_seconds == 0 {
            return Err(crate::error::AppError::Config(
                "server.request_timeout_seconds must be greater than 0".to_string(),
            ));
        }
        if self.server.request_timeout_seconds > 300 {
            return Err(crate::error::AppError::Config(format!(
                "server.request_timeout_seconds cannot exceed 300 seconds (5 minutes), got {}",
                self.server.request_timeout_seconds
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = crate::error::AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(toml_str).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }
}
