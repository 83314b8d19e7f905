//! LMStudio backend (local, OpenAI-compatible chat completions)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{chat_messages, snippet, ChatBackend, ChatMessage, MAX_OUTPUT_TOKENS, TEMPERATURE};
use crate::api::{DispatchError, Provider, RawLlmResult};
use crate::config::ProviderConfig;

const PROVIDER: Provider = Provider::LmStudio;

/// Backend for LMStudio's OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug)]
pub struct LmStudioBackend {
    client: Client,
    base_url: String,
    model: Option<String>,
}

impl LmStudioBackend {
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
        match envelope
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
        {
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

        let body = CompletionsRequest {
            model,
            messages: chat_messages(system_instruction, user_prompt),
            temperature: TEMPERATURE,
            max_tokens: MAX_OUTPUT_TOKENS,
            stream: false,
            // json_object is the mode LMStudio versions support consistently
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(model, "sending LMStudio chat-completions request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::from_reqwest(PROVIDER, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "LMStudio response received");

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
impl ChatBackend for LmStudioBackend {
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
                warn!(error = %err, "LMStudio call failed");
                err.into_raw()
            }
        }
    }
}

// OpenAI-compatible API types

#[derive(Debug, Serialize)]
struct CompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}
