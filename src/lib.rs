//! compintel - Competitive-analysis core
//!
//! A caller submits a free-text market research query plus a provider id;
//! this crate sends a schema-guided prompt to one of three pluggable LLM
//! backends over HTTP, normalizes the provider's response envelope, and
//! strictly validates the output into a [`CompetitiveAnalysis`]. Every
//! failure mode comes back as a classified [`AnalysisOutcome`] value -
//! nothing in the pipeline raises past the resolver boundary.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use compintel::resolve_analysis;
//!
//! let outcome = resolve_analysis("Who competes with ExampleCorp?", "ollama").await;
//! match outcome {
//!     compintel::AnalysisOutcome::Structured { data, .. } => println!("{}", data.summary),
//!     compintel::AnalysisOutcome::Error { message, .. } => eprintln!("{message}"),
//! }
//! ```
//!
//! # Configuration-Driven Providers
//!
//! Provider endpoints, models, and credentials come from one [`AppConfig`]
//! value loaded at startup (environment variables, optionally a YAML file).
//! A provider with missing required configuration degrades to always-error;
//! it never crashes the process.

use std::sync::Arc;

// =============================================================================
// Internal Modules
// =============================================================================

mod api;
mod config;
mod core;
mod spi;

pub mod testing;

// =============================================================================
// Public API - Types & Errors (from api/)
// =============================================================================

pub use api::{
    // Types
    AnalysisOutcome, AnalysisRequest, CompetitiveAnalysis, CompetitorInfo, ErrorKind,
    MarketTrend, Provider, RawLlmResult, ValidationDetail,
    // Errors
    DispatchError,
    // Dispatcher contract
    LlmDispatcher,
};

// =============================================================================
// Public API - Configuration
// =============================================================================

pub use config::{keys, AppConfig, ConfigError, ProviderConfig};

// =============================================================================
// Public API - Backends (from spi/)
// =============================================================================

pub use spi::{ChatBackend, GeminiBackend, LmStudioBackend, OllamaBackend};

// =============================================================================
// Public API - Pipeline (from core/)
// =============================================================================

pub use core::prompt::SYSTEM_INSTRUCTION;
pub use core::{strip_code_fences, HttpDispatcher, MarketResearchAgent, ResponseResolver};

// =============================================================================
// Factory Functions
// =============================================================================

/// Create an agent with providers configured from the environment.
///
/// Reads a `.env` file when present, then the `GEMINI_*`, `OLLAMA_*`, and
/// `LMSTUDIO_*` variables (see [`keys`]).
pub fn create_agent() -> MarketResearchAgent {
    create_agent_from_config(&AppConfig::from_env())
}

/// Create an agent from explicit configuration.
///
/// Use this for programmatic configuration or when loading from a config
/// file:
///
/// ```no_run
/// use compintel::{create_agent_from_config, AppConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AppConfig::load("config.yml")?;
/// let agent = create_agent_from_config(&config);
/// # Ok(())
/// # }
/// ```
pub fn create_agent_from_config(config: &AppConfig) -> MarketResearchAgent {
    MarketResearchAgent::new(Arc::new(HttpDispatcher::new(config)))
}

/// One-shot convenience entry point: analyze `query` with `provider`.
///
/// Builds a fresh agent from the environment per call. Callers issuing many
/// requests should hold a [`MarketResearchAgent`] instead so the HTTP stack
/// is shared.
pub async fn resolve_analysis(query: &str, provider: &str) -> AnalysisOutcome {
    create_agent().analyze(query, provider).await
}
