use serde_json::Value;
use thiserror::Error;

use super::types::{Provider, RawLlmResult};

/// Transport-level failures raised inside a backend call.
///
/// These never cross the dispatcher boundary: `ChatBackend::invoke` folds
/// every variant into a [`RawLlmResult::ProviderError`] value via
/// [`DispatchError::into_raw`].
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("{} API key not configured", .0.label())]
    MissingApiKey(Provider),

    #[error("{} model not configured", .0.label())]
    MissingModel(Provider),

    #[error("{} request timed out", .0.label())]
    Timeout(Provider),

    #[error("{}: network error", .provider.label())]
    Network { provider: Provider, message: String },

    #[error("{} API Error: {status}", .provider.label())]
    Api {
        provider: Provider,
        status: u16,
        body: String,
    },

    #[error("{}: response body was not valid JSON", .provider.label())]
    InvalidBody { provider: Provider, snippet: String },

    #[error("{}: unexpected response envelope", .provider.label())]
    Envelope { provider: Provider, payload: Value },
}

impl DispatchError {
    /// Map a reqwest failure, distinguishing timeouts from other I/O errors.
    pub fn from_reqwest(provider: Provider, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DispatchError::Timeout(provider)
        } else {
            DispatchError::Network {
                provider,
                message: err.to_string(),
            }
        }
    }

    /// Diagnostic payload carried alongside the message, where one exists.
    fn details(self) -> Option<Value> {
        match self {
            DispatchError::MissingApiKey(_)
            | DispatchError::MissingModel(_)
            | DispatchError::Timeout(_) => None,
            DispatchError::Network { message, .. } => Some(Value::String(message)),
            DispatchError::Api { body, .. } => Some(Value::String(body)),
            DispatchError::InvalidBody { snippet, .. } => Some(Value::String(snippet)),
            DispatchError::Envelope { payload, .. } => Some(payload),
        }
    }

    /// Fold this error into the dispatcher's value-level error representation.
    pub fn into_raw(self) -> RawLlmResult {
        let message = self.to_string();
        RawLlmResult::ProviderError {
            message,
            details: self.details(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_names_the_provider() {
        for provider in Provider::ALL {
            let message = DispatchError::Timeout(provider).to_string();
            assert!(message.contains(provider.label()));
            assert!(message.contains("timed out"));
        }
    }

    #[test]
    fn api_error_message_carries_status() {
        let err = DispatchError::Api {
            provider: Provider::Gemini,
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "Gemini API Error: 503");
    }

    #[test]
    fn into_raw_preserves_details() {
        let raw = DispatchError::Api {
            provider: Provider::Ollama,
            status: 500,
            body: "boom".to_string(),
        }
        .into_raw();
        match raw {
            RawLlmResult::ProviderError { message, details } => {
                assert!(message.contains("Ollama API Error: 500"));
                assert_eq!(details, Some(Value::String("boom".to_string())));
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn missing_key_has_no_details() {
        match DispatchError::MissingApiKey(Provider::Gemini).into_raw() {
            RawLlmResult::ProviderError { message, details } => {
                assert!(message.contains("not configured"));
                assert!(details.is_none());
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }
}
