//! # Answer Service Configuration
//!
//! Process-wide settings for the Azure OpenAI chat-completion endpoint. The
//! configuration is loaded once at startup, is immutable afterwards, and is
//! passed explicitly to the provider constructor.
//!
//! Settings come from the environment (a `.env` file is honoured):
//! - `AZURE_OPENAI_ENDPOINT` (required)
//! - `AZURE_OPENAI_API_KEY` (required)
//! - `AZURE_OPENAI_DEPLOYMENT` (required)
//! - `AZURE_OPENAI_API_VERSION` (default `2024-02-01`)
//! - `AZURE_OPENAI_TIMEOUT_SECS` (default `120`)

use crate::errors::ConfigError;
use config::{Config as ConfigBuilder, Environment};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use tracing::info;

pub const DEFAULT_API_VERSION: &str = "2024-02-01";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

const ENV_PREFIX: &str = "AZURE_OPENAI";

#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct AzureOpenAiConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub deployment: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl fmt::Debug for AzureOpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AzureOpenAiConfig {
    /// Creates a configuration with the default API version and timeout.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: default_api_version(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Loads the configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_overrides(HashMap::new())
    }

    /// Like `from_env`, but values in `overrides` (keyed by variable name) win
    /// over the environment. Used for command-line flags.
    pub fn from_env_with_overrides(
        overrides: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded environment from '{}'.", path.display());
        }
        let mut vars: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        vars.extend(overrides);
        Self::from_vars(vars)
    }

    /// Loads the configuration from an explicit set of variables instead of the
    /// process environment. Keys use the same names as the environment variables.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::load(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
    }

    fn load(source: Environment) -> Result<Self, ConfigError> {
        let settings = ConfigBuilder::builder()
            .add_source(source.prefix_separator("_").try_parsing(true))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.validate()
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        self.endpoint = self.endpoint.trim().trim_end_matches('/').to_string();
        if self.endpoint.is_empty() {
            return Err(ConfigError::Missing("AZURE_OPENAI_ENDPOINT"));
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("AZURE_OPENAI_API_KEY"));
        }
        if self.deployment.trim().is_empty() {
            return Err(ConfigError::Missing("AZURE_OPENAI_DEPLOYMENT"));
        }
        if self.api_version.trim().is_empty() {
            self.api_version = default_api_version();
        }
        Ok(self)
    }

    /// The full chat-completions URL for the configured deployment.
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}
