//! Environment variable names for provider configuration
//!
//! Centralized constants keep the variable names consistent between the
//! config loader, the docs, and the tests.

/// Google Gemini API key.
pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Google API key (accepted as a fallback for Gemini).
pub const GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";

/// Gemini model identifier.
pub const GEMINI_MODEL: &str = "GEMINI_MODEL";

/// Gemini custom base URL.
pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";

/// Ollama server base URL.
pub const OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";

/// Ollama model name.
pub const OLLAMA_MODEL: &str = "OLLAMA_MODEL";

/// LMStudio OpenAI-compatible endpoint base URL.
pub const LMSTUDIO_BASE_URL: &str = "LMSTUDIO_BASE_URL";

/// LMStudio model identifier. Required: LMStudio has no usable default.
pub const LMSTUDIO_MODEL: &str = "LMSTUDIO_MODEL";

/// All recognized configuration keys.
pub const ALL_KEYS: &[&str] = &[
    GEMINI_API_KEY,
    GOOGLE_API_KEY,
    GEMINI_MODEL,
    GEMINI_BASE_URL,
    OLLAMA_BASE_URL,
    OLLAMA_MODEL,
    LMSTUDIO_BASE_URL,
    LMSTUDIO_MODEL,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_constants_match_names() {
        assert_eq!(GEMINI_API_KEY, "GEMINI_API_KEY");
        assert_eq!(LMSTUDIO_MODEL, "LMSTUDIO_MODEL");
    }

    #[test]
    fn all_keys_contains_every_provider() {
        assert!(ALL_KEYS.contains(&GEMINI_API_KEY));
        assert!(ALL_KEYS.contains(&OLLAMA_BASE_URL));
        assert!(ALL_KEYS.contains(&LMSTUDIO_BASE_URL));
    }
}
