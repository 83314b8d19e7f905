//! Google Gemini backend (cloud, API-key auth)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{snippet, ChatBackend, MAX_OUTPUT_TOKENS, TEMPERATURE, TOP_K, TOP_P};
use crate::api::{DispatchError, Provider, RawLlmResult};
use crate::config::ProviderConfig;

const PROVIDER: Provider = Provider::Gemini;

/// Backend for Google's generate-content API.
#[derive(Debug)]
pub struct GeminiBackend {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: Option<String>,
}

impl GeminiBackend {
    pub fn new(config: &ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model().map(str::to_string),
        }
    }

    /// Gemini expects a `models/` prefix on the identifier.
    fn request_url(&self, model: &str) -> String {
        if model.starts_with("models/") {
            format!("{}/{}:generateContent", self.base_url, model)
        } else {
            format!("{}/models/{}:generateContent", self.base_url, model)
        }
    }

    /// Pull the assistant text out of the success envelope.
    ///
    /// Safety blocks and empty candidate lists come back as an envelope
    /// error carrying `promptFeedback` when present, else the whole body.
    fn extract_content(envelope: Value) -> Result<String, DispatchError> {
        match envelope
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
        {
            Some(text) => Ok(text.to_string()),
            None => {
                let payload = envelope
                    .get("promptFeedback")
                    .cloned()
                    .unwrap_or(envelope);
                Err(DispatchError::Envelope {
                    provider: PROVIDER,
                    payload,
                })
            }
        }
    }

    async fn request(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, DispatchError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(DispatchError::MissingApiKey(PROVIDER))?;
        let model = self
            .model
            .as_deref()
            .ok_or(DispatchError::MissingModel(PROVIDER))?;

        let body = GenerateRequest {
            system_instruction: Instruction {
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: user_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: MAX_OUTPUT_TOKENS,
                response_mime_type: "application/json",
            },
        };

        let url = self.request_url(model);
        debug!(model, "sending Gemini generate-content request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::from_reqwest(PROVIDER, e))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Gemini response received");

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
impl ChatBackend for GeminiBackend {
    fn provider(&self) -> Provider {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.model.is_some()
    }

    async fn invoke(&self, system_instruction: &str, user_prompt: &str) -> RawLlmResult {
        match self.request(system_instruction, user_prompt).await {
            Ok(text) => RawLlmResult::Text(text),
            Err(err) => {
                warn!(error = %err, "Gemini call failed");
                err.into_raw()
            }
        }
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    system_instruction: Instruction<'a>,
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "topK")]
    top_k: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    // Best-effort JSON hint; the resolver still tolerates non-JSON output
    response_mime_type: &'static str,
}
