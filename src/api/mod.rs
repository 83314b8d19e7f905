//! Dispatcher contract, domain types, and transport errors

mod error;
mod types;

use async_trait::async_trait;

pub use error::DispatchError;
pub use types::{
    AnalysisOutcome, AnalysisRequest, CompetitiveAnalysis, CompetitorInfo, ErrorKind,
    MarketTrend, Provider, RawLlmResult, ValidationDetail,
};

/// Uniform invocation of heterogeneous chat-style LLM HTTP APIs.
///
/// Exactly one outbound request per call, bounded by the provider's
/// configured timeout. Implementations never return an error: every
/// transport failure, unexpected envelope, or missing credential is folded
/// into [`RawLlmResult::ProviderError`].
///
/// # Example
/// ```ignore
/// let raw = dispatcher.invoke(Provider::Ollama, system, prompt).await;
/// let outcome = resolver.resolve(raw);
/// ```
#[async_trait]
pub trait LlmDispatcher: Send + Sync {
    /// Send one schema-guided prompt to `provider` and normalize the result.
    async fn invoke(
        &self,
        provider: Provider,
        system_instruction: &str,
        user_prompt: &str,
    ) -> RawLlmResult;
}
