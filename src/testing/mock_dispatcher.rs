//! Mock dispatcher for testing
//!
//! `MockDispatcher` implements `LlmDispatcher` without making any network
//! calls. Tests configure the returned result and assert on call counters
//! and the last recorded invocation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{LlmDispatcher, Provider, RawLlmResult};

/// Behaviour when `invoke()` is called.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Echo the user prompt back as text (default).
    Echo,
    /// Return this result verbatim.
    Result(RawLlmResult),
}

impl Default for MockBehaviour {
    fn default() -> Self {
        Self::Echo
    }
}

/// Mock implementation of [`LlmDispatcher`].
///
/// Never contacts a provider. Configurable response behaviour plus call
/// counters for "no network call happened" assertions.
///
/// # Example
///
/// ```rust,ignore
/// let mock = Arc::new(MockDispatcher::new()
///     .with_behaviour(MockBehaviour::Result(RawLlmResult::Text(payload))));
/// let agent = MarketResearchAgent::new(mock.clone());
/// ```
pub struct MockDispatcher {
    behaviour: MockBehaviour,
    invoke_calls: AtomicU64,
    last_invocation: Mutex<Option<(Provider, String, String)>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self {
            behaviour: MockBehaviour::Echo,
            invoke_calls: AtomicU64::new(0),
            last_invocation: Mutex::new(None),
        }
    }

    /// Set the response behaviour.
    pub fn with_behaviour(mut self, behaviour: MockBehaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Shorthand for a fixed text response.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_behaviour(MockBehaviour::Result(RawLlmResult::Text(text.into())))
    }

    /// Shorthand for a fixed provider error.
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.with_behaviour(MockBehaviour::Result(RawLlmResult::ProviderError {
            message: message.into(),
            details: None,
        }))
    }

    /// Number of times `invoke()` was called.
    pub fn invoke_calls(&self) -> u64 {
        self.invoke_calls.load(Ordering::Relaxed)
    }

    /// Provider, system instruction, and user prompt of the last call.
    pub fn last_invocation(&self) -> Option<(Provider, String, String)> {
        self.last_invocation
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }
}

impl Default for MockDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmDispatcher for MockDispatcher {
    async fn invoke(
        &self,
        provider: Provider,
        system_instruction: &str,
        user_prompt: &str,
    ) -> RawLlmResult {
        self.invoke_calls.fetch_add(1, Ordering::Relaxed);
        *self.last_invocation.lock().expect("mock lock poisoned") = Some((
            provider,
            system_instruction.to_string(),
            user_prompt.to_string(),
        ));

        match &self.behaviour {
            MockBehaviour::Echo => RawLlmResult::Text(user_prompt.to_string()),
            MockBehaviour::Result(result) => result.clone(),
        }
    }
}
