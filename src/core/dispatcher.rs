//! HTTP dispatcher: routes a provider to its backend and cleans the output

use async_trait::async_trait;

use crate::api::{LlmDispatcher, Provider, RawLlmResult};
use crate::config::AppConfig;
use crate::spi::{ChatBackend, GeminiBackend, LmStudioBackend, OllamaBackend};

/// Production [`LlmDispatcher`]: one backend per provider, each with its own
/// HTTP client and timeout, all built once from an injected [`AppConfig`].
#[derive(Debug)]
pub struct HttpDispatcher {
    gemini: GeminiBackend,
    ollama: OllamaBackend,
    lmstudio: LmStudioBackend,
}

impl HttpDispatcher {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            gemini: GeminiBackend::new(&config.gemini),
            ollama: OllamaBackend::new(&config.ollama),
            lmstudio: LmStudioBackend::new(&config.lmstudio),
        }
    }

    fn backend(&self, provider: Provider) -> &dyn ChatBackend {
        match provider {
            Provider::Gemini => &self.gemini,
            Provider::Ollama => &self.ollama,
            Provider::LmStudio => &self.lmstudio,
        }
    }

    /// True when the selected provider has all required configuration.
    pub fn is_configured(&self, provider: Provider) -> bool {
        self.backend(provider).is_configured()
    }
}

#[async_trait]
impl LlmDispatcher for HttpDispatcher {
    async fn invoke(
        &self,
        provider: Provider,
        system_instruction: &str,
        user_prompt: &str,
    ) -> RawLlmResult {
        match self
            .backend(provider)
            .invoke(system_instruction, user_prompt)
            .await
        {
            RawLlmResult::Text(text) => RawLlmResult::Text(strip_code_fences(&text)),
            err @ RawLlmResult::ProviderError { .. } => err,
        }
    }
}

/// Strip a Markdown code fence (optionally labeled `json`) and surrounding
/// whitespace. Cosmetic cleanup only; validation happens in the resolver.
pub fn strip_code_fences(text: &str) -> String {
    let mut cleaned = text.trim();

    if let Some(rest) = cleaned.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(label) if label.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        cleaned = rest.trim_start();
    }
    if let Some(body) = cleaned.strip_suffix("```") {
        cleaned = body.trim_end();
    }

    cleaned.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  \n"), "{\"a\": 1}");
    }

    #[test]
    fn labeled_fence_is_stripped() {
        assert_eq!(
            strip_code_fences("```json\n{\"a\": 1}\n```"),
            "{\"a\": 1}"
        );
    }

    #[test]
    fn unlabeled_fence_is_stripped() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn fence_label_is_case_insensitive() {
        assert_eq!(strip_code_fences("```JSON\n{}\n```"), "{}");
    }

    #[test]
    fn inner_backticks_survive() {
        assert_eq!(
            strip_code_fences("{\"note\": \"use ``` for code\"}"),
            "{\"note\": \"use ``` for code\"}"
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(strip_code_fences(""), "");
        assert_eq!(strip_code_fences("   "), "");
    }

    #[tokio::test]
    async fn dispatcher_cleans_before_returning() {
        // An unconfigured backend still exercises the error passthrough arm
        let config = AppConfig::default();
        let dispatcher = HttpDispatcher::new(&config);
        assert!(!dispatcher.is_configured(crate::api::Provider::Gemini));

        match dispatcher
            .invoke(crate::api::Provider::Gemini, "sys", "usr")
            .await
        {
            RawLlmResult::ProviderError { message, .. } => {
                assert!(message.contains("not configured"));
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }
}
