//! Configuration: per-provider settings loaded once at process start

mod app;
pub mod keys;
mod provider;

pub use app::{
    AppConfig, ConfigError, GEMINI_DEFAULT_BASE_URL, LMSTUDIO_DEFAULT_BASE_URL,
    OLLAMA_DEFAULT_BASE_URL,
};
pub use provider::ProviderConfig;
