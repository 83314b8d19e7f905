//! Process-wide provider configuration
//!
//! One [`AppConfig`] value is constructed at startup (from the environment,
//! a YAML file, or both) and injected into the dispatcher. There is no
//! global singleton; tests substitute their own configs.
//!
//! # Example Configuration (YAML)
//!
//! ```yaml
//! gemini:
//!   api_key: AIza...
//!   model: models/gemini-1.5-flash-latest
//!   base_url: https://generativelanguage.googleapis.com/v1beta
//!   timeout_ms: 120000
//! ollama:
//!   base_url: http://localhost:11434
//!   model: phi4
//!   timeout_ms: 180000
//! lmstudio:
//!   base_url: http://localhost:1234/v1
//!   model: my-local-model
//!   timeout_ms: 180000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::keys;
use super::provider::ProviderConfig;
use crate::api::Provider;

/// Default endpoints, matching each provider's stock install.
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const LMSTUDIO_DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

const GEMINI_DEFAULT_MODEL: &str = "models/gemini-1.5-flash-latest";
const OLLAMA_DEFAULT_MODEL: &str = "phi4";

const GEMINI_TIMEOUT_MS: u64 = 120_000;
const LOCAL_TIMEOUT_MS: u64 = 180_000;

/// Configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] serde_yaml::Error),
}

/// Per-provider settings for the whole process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: ProviderConfig,
    pub ollama: ProviderConfig,
    pub lmstudio: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: ProviderConfig {
                base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
                model: Some(GEMINI_DEFAULT_MODEL.to_string()),
                api_key: None,
                timeout_ms: GEMINI_TIMEOUT_MS,
            },
            ollama: ProviderConfig {
                base_url: OLLAMA_DEFAULT_BASE_URL.to_string(),
                model: Some(OLLAMA_DEFAULT_MODEL.to_string()),
                api_key: None,
                timeout_ms: LOCAL_TIMEOUT_MS,
            },
            // LMStudio serves whatever model the user loaded; there is no
            // meaningful default, so the provider stays unusable until
            // LMSTUDIO_MODEL is set.
            lmstudio: ProviderConfig {
                base_url: LMSTUDIO_DEFAULT_BASE_URL.to_string(),
                model: None,
                api_key: None,
                timeout_ms: LOCAL_TIMEOUT_MS,
            },
        }
    }
}

impl AppConfig {
    /// Load from the environment, with defaults for everything optional.
    ///
    /// Reads a `.env` file into the process environment first, then applies
    /// per-key overrides. Missing credentials are left unset; the affected
    /// provider will answer every request with a configuration error.
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();

        let mut config = Self::default();

        if let Some(key) = env_var(keys::GEMINI_API_KEY).or_else(|| env_var(keys::GOOGLE_API_KEY))
        {
            config.gemini.api_key = Some(key);
        }
        if let Some(model) = env_var(keys::GEMINI_MODEL) {
            config.gemini.model = Some(model);
        }
        if let Some(url) = env_var(keys::GEMINI_BASE_URL) {
            config.gemini.base_url = url;
        }

        if let Some(url) = env_var(keys::OLLAMA_BASE_URL) {
            config.ollama.base_url = url;
        }
        if let Some(model) = env_var(keys::OLLAMA_MODEL) {
            config.ollama.model = Some(model);
        }

        if let Some(url) = env_var(keys::LMSTUDIO_BASE_URL) {
            config.lmstudio.base_url = url;
        }
        if let Some(model) = env_var(keys::LMSTUDIO_MODEL) {
            config.lmstudio.model = Some(model);
        }

        if config.gemini.api_key().is_none() {
            tracing::warn!("Gemini API key not found; Gemini requests will fail");
        }
        if config.lmstudio.model().is_none() {
            tracing::warn!("LMSTUDIO_MODEL not set; LMStudio requests will fail");
        }

        config
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Settings for a specific provider.
    pub fn get(&self, provider: Provider) -> &ProviderConfig {
        match provider {
            Provider::Gemini => &self.gemini,
            Provider::Ollama => &self.ollama,
            Provider::LmStudio => &self.lmstudio,
        }
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
