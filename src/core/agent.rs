//! Market research agent: the single entry point over dispatcher + resolver

use std::sync::Arc;

use tracing::{debug, info};

use super::prompt::{PromptTemplate, SYSTEM_INSTRUCTION};
use super::resolver::ResponseResolver;
use crate::api::{AnalysisOutcome, AnalysisRequest, ErrorKind, LlmDispatcher, Provider};

/// Performs one competitive analysis per call: parse the provider id, render
/// the schema-guided prompt, dispatch, resolve.
///
/// The dispatcher is injected so tests can substitute a mock and callers can
/// share one HTTP stack across requests. The agent holds no per-request
/// state; concurrent calls are independent.
pub struct MarketResearchAgent {
    dispatcher: Arc<dyn LlmDispatcher>,
    resolver: ResponseResolver,
    template: PromptTemplate,
}

impl MarketResearchAgent {
    pub fn new(dispatcher: Arc<dyn LlmDispatcher>) -> Self {
        Self {
            dispatcher,
            resolver: ResponseResolver::new(),
            template: PromptTemplate::new(),
        }
    }

    /// Analyze `query` with the provider named by `provider_id`.
    ///
    /// An unrecognized id yields `ErrorKind::InvalidProvider` without
    /// touching the dispatcher. Everything else flows through the
    /// dispatch-then-resolve pipeline and comes back as a value.
    pub async fn analyze(&self, query: &str, provider_id: &str) -> AnalysisOutcome {
        let Some(provider) = Provider::parse(provider_id) else {
            return AnalysisOutcome::error(
                ErrorKind::InvalidProvider,
                format!("invalid provider selected: {provider_id}"),
            );
        };

        self.analyze_request(&AnalysisRequest {
            query: query.to_string(),
            provider,
        })
        .await
    }

    /// Analyze an already-typed request.
    pub async fn analyze_request(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let preview: String = request.query.chars().take(50).collect();
        info!(provider = %request.provider, "starting competitive analysis");
        debug!(query = %preview, "analysis query");

        let user_prompt = self.template.render(&request.query);
        let raw = self
            .dispatcher
            .invoke(request.provider, SYSTEM_INSTRUCTION, &user_prompt)
            .await;

        self.resolver.resolve(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RawLlmResult;
    use crate::testing::{MockBehaviour, MockDispatcher};

    #[tokio::test]
    async fn unknown_provider_never_reaches_the_dispatcher() {
        let mock = Arc::new(MockDispatcher::new());
        let agent = MarketResearchAgent::new(mock.clone());

        let outcome = agent.analyze("who competes?", "chatgpt").await;
        assert_eq!(outcome.kind(), Some(ErrorKind::InvalidProvider));
        assert_eq!(mock.invoke_calls(), 0);
    }

    #[tokio::test]
    async fn prompt_carries_schema_and_query() {
        let mock = Arc::new(MockDispatcher::new().with_behaviour(MockBehaviour::Result(
            RawLlmResult::Text("not json".to_string()),
        )));
        let agent = MarketResearchAgent::new(mock.clone());

        agent.analyze("niche CRM vendors", "ollama").await;

        let (provider, system, user) = mock.last_invocation().expect("dispatcher was called");
        assert_eq!(provider, Provider::Ollama);
        assert_eq!(system, SYSTEM_INSTRUCTION);
        assert!(user.contains("niche CRM vendors"));
        assert!(user.contains("competitors"));
    }
}
