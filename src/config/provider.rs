use serde::{Deserialize, Serialize};

/// Settings for one LLM backend. Loaded once at startup, immutable afterwards.
///
/// A missing required value (credential for cloud providers, model for
/// LMStudio) degrades that provider to always-error; it never crashes the
/// process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider's HTTP API. Trailing slashes are tolerated.
    pub base_url: String,

    /// Model identifier sent with each request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Credential, for providers that require one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds. Local providers get a longer bound
    /// since they may run on constrained hardware.
    pub timeout_ms: u64,
}

impl ProviderConfig {
    /// The configured model, treating the empty string as unset.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref().filter(|m| !m.is_empty())
    }

    /// The configured credential, treating the empty string as unset.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_strings_count_as_unset() {
        let config = ProviderConfig {
            base_url: "http://localhost:1234/v1".to_string(),
            model: Some(String::new()),
            api_key: Some(String::new()),
            timeout_ms: 1_000,
        };
        assert_eq!(config.model(), None);
        assert_eq!(config.api_key(), None);
    }
}
