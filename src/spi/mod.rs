//! Provider backends — one module per chat-style HTTP API
//!
//! Each backend knows exactly one provider's request shape and response
//! envelope. They share a single contract: send one bounded HTTP request,
//! extract the assistant's text, and fold every failure into a
//! [`RawLlmResult::ProviderError`] value.

mod gemini;
mod lmstudio;
mod ollama;

pub use gemini::GeminiBackend;
pub use lmstudio::LmStudioBackend;
pub use ollama::OllamaBackend;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::{Provider, RawLlmResult};

/// Sampling settings shared by all backends. Low temperature biases the
/// models toward schema-faithful output.
pub(crate) const TEMPERATURE: f32 = 0.4;
pub(crate) const TOP_K: u32 = 40;
pub(crate) const TOP_P: f32 = 0.95;
pub(crate) const MAX_OUTPUT_TOKENS: u32 = 3500;

/// A single chat-style LLM HTTP backend.
///
/// `invoke` makes at most one outbound request. When the backend's required
/// configuration is missing, it answers immediately with a `ProviderError`
/// and no network call is made.
#[async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Which provider this backend speaks to.
    fn provider(&self) -> Provider;

    /// True when the required credentials and model are present.
    /// Must not make network calls.
    fn is_configured(&self) -> bool;

    /// Send one system instruction + user prompt pair and normalize the result.
    async fn invoke(&self, system_instruction: &str, user_prompt: &str) -> RawLlmResult;
}

/// System/user message pair for the chat-shaped providers.
#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

pub(crate) fn chat_messages<'a>(
    system_instruction: &'a str,
    user_prompt: &'a str,
) -> Vec<ChatMessage<'a>> {
    vec![
        ChatMessage {
            role: "system",
            content: system_instruction,
        },
        ChatMessage {
            role: "user",
            content: user_prompt,
        },
    ]
}

/// Cap provider output carried into error details.
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_caps_at_500_chars() {
        let long = "x".repeat(2_000);
        assert_eq!(snippet(&long).len(), 500);
        assert_eq!(snippet("short"), "short");
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let multibyte = "é".repeat(600);
        let capped = snippet(&multibyte);
        assert_eq!(capped.chars().count(), 500);
    }

    #[test]
    fn chat_messages_order_is_system_then_user() {
        let messages = chat_messages("sys", "usr");
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }
}
