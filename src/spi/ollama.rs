//! Ollama backend (local chat API)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{chat_messages, snippet, ChatBackend, ChatMessage, TEMPERATURE, TOP_K, TOP_P};
use crate::api::{DispatchError, Provider, RawLlmResult};
use crate::config::ProviderConfig;

const PROVIDER: Provider = Provider::Ollama;

/// Backend for a local Ollama server's `/api/chat` endpoint.
#[derive(Debug)]
pub struct OllamaBackend {
    client: Client,
    base_url: String,
    model: Option<String>,
}

impl OllamaBackend {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model().map(str::to_string),
        }
    }

    fn extract_content(envelope: Value) -> Result<String, DispatchError> {
        match envelope.pointer("/message/content").and_then(Value::as_str) {
            Some(text) => Ok(text.to_string()),
            None => Err(DispatchError::Envelope {
                provider: PROVIDER,
                payload: envelope,
            }),
        }
    }

    async fn request(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, DispatchError> {
        let model = self
            .model
            .as_deref()
            .ok_or(DispatchError::MissingModel(PROVIDER))?;

        let body = ChatRequest {
            model,
            messages: chat_messages(system_instruction, user_prompt),
            stream: false,
            format: "json",
            options: SamplingOptions {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
            },
        };

        let url = format!("{}/api/chat", self.base_url);
        debug!(model, url = %url, "sending Ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::from_reqwest(PROVIDER, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Ollama response received");

        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::from_reqwest(PROVIDER, e))?;

        if !status.is_success() {
            return Err(DispatchError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body: snippet(&text),
            });
        }

        let envelope: Value =
            serde_json::from_str(&text).map_err(|_| DispatchError::InvalidBody {
                provider: PROVIDER,
                snippet: snippet(&text),
            })?;

        Self::extract_content(envelope)
    }
}

#[async_trait]
impl ChatBackend for OllamaBackend {
    fn provider(&self) -> Provider {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    async fn invoke(&self, system_instruction: &str, user_prompt: &str) -> RawLlmResult {
        match self.request(system_instruction, user_prompt).await {
            Ok(text) => RawLlmResult::Text(text),
            Err(err) => {
                warn!(error = %err, "Ollama call failed");
                err.into_raw()
            }
        }
    }
}

// Ollama API types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    format: &'static str,
    options: SamplingOptions,
}

#[derive(Debug, Serialize)]
struct SamplingOptions {
    temperature: f32,
    top_k: u32,
    top_p: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trailing_slash_on_base_url_is_trimmed() {
        let b = OllamaBackend::new(&ProviderConfig {
            base_url: "http://localhost:11434/".to_string(),
            model: Some("phi4".to_string()),
            api_key: None,
            timeout_ms: 1_000,
        });
        assert_eq!(b.base_url, "http://localhost:11434");
    }

    #[test]
    fn request_body_asks_for_json_format() {
        let body = ChatRequest {
            model: "phi4",
            messages: chat_messages("sys", "usr"),
            stream: false,
            format: "json",
            options: SamplingOptions {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["format"], "json");
        assert_eq!(value["stream"], false);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
    }

    #[test]
    fn extract_content_from_chat_envelope() {
        let envelope = json!({
            "model": "phi4",
            "message": { "role": "assistant", "content": "{\"ok\": true}" },
            "done": true
        });
        assert_eq!(
            OllamaBackend::extract_content(envelope).unwrap(),
            "{\"ok\": true}"
        );
    }

    #[test]
    fn missing_message_is_an_envelope_error() {
        let envelope = json!({ "done": true });
        let err = OllamaBackend::extract_content(envelope).unwrap_err();
        match err {
            DispatchError::Envelope { payload, .. } => assert_eq!(payload["done"], true),
            other => panic!("expected Envelope error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_timeout_is_reported_as_timed_out() {
        // Bound socket that never answers: the connection lands in the
        // accept backlog and the request times out client-side
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let b = OllamaBackend::new(&ProviderConfig {
            base_url: format!("http://{addr}"),
            model: Some("phi4".to_string()),
            api_key: None,
            timeout_ms: 250,
        });
        match b.invoke("sys", "usr").await {
            RawLlmResult::ProviderError { message, .. } => {
                assert!(message.contains("timed out"), "message: {message}");
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_refused_is_a_network_error() {
        // Grab a free port, then close the listener before connecting
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let b = OllamaBackend::new(&ProviderConfig {
            base_url: format!("http://{addr}"),
            model: Some("phi4".to_string()),
            api_key: None,
            timeout_ms: 1_000,
        });
        match b.invoke("sys", "usr").await {
            RawLlmResult::ProviderError { message, details } => {
                assert!(message.contains("network error"), "message: {message}");
                assert!(details.is_some());
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_model_fails_without_network() {
        let b = OllamaBackend::new(&ProviderConfig {
            base_url: "http://localhost:11434".to_string(),
            model: None,
            api_key: None,
            timeout_ms: 1_000,
        });
        assert!(!b.is_configured());
        match b.invoke("sys", "usr").await {
            RawLlmResult::ProviderError { message, .. } => {
                assert!(message.contains("Ollama model not configured"));
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }
}
