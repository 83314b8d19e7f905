use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One of the three interchangeable LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Ollama,
    LmStudio,
}

impl Provider {
    /// Every provider the core knows about, in display order.
    pub const ALL: [Provider; 3] = [Provider::Ollama, Provider::LmStudio, Provider::Gemini];

    /// Parse a provider id as submitted by the caller.
    ///
    /// Returns `None` for anything outside the fixed enumerated set;
    /// unrecognized ids must never reach the dispatcher.
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(Provider::Gemini),
            "ollama" => Some(Provider::Ollama),
            "lmstudio" => Some(Provider::LmStudio),
            _ => None,
        }
    }

    /// Stable identifier used in configuration and request parameters.
    pub fn id(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::Ollama => "ollama",
            Provider::LmStudio => "lmstudio",
        }
    }

    /// Human-readable name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Gemini => "Gemini",
            Provider::Ollama => "Ollama",
            Provider::LmStudio => "LMStudio",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One analysis request as received from the caller. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub query: String,
    pub provider: Provider,
}

/// What a single backend call produced: the model's raw text, or a
/// normalized error payload. Backends never raise past this boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RawLlmResult {
    /// The assistant's textual content, extracted from the provider envelope.
    Text(String),
    /// A handled failure: transport error, bad envelope, or missing configuration.
    ProviderError {
        message: String,
        details: Option<Value>,
    },
}

/// A single competitor in the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetitorInfo {
    /// Name of the competitor.
    pub name: String,
    /// Key strengths of the competitor.
    pub strengths: Vec<String>,
    /// Key weaknesses of the competitor.
    pub weaknesses: Vec<String>,
    /// Estimated market share, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_share: Option<String>,
    /// Notable features or capabilities.
    pub key_features: Vec<String>,
    /// Pricing information, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<String>,
}

/// A market trend relevant to the analyzed product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarketTrend {
    /// Description of the trend.
    pub trend: String,
    /// Potential impact on the product.
    pub impact: String,
    /// Opportunity the trend presents, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opportunity: Option<String>,
    /// Threat the trend presents, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threat: Option<String>,
}

/// The target schema the model is asked to fill.
///
/// Validation is all-or-nothing: every required field must be present and
/// correctly typed or the whole object is rejected. Empty lists are
/// schema-valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetitiveAnalysis {
    /// Key competitors, in model output order.
    pub competitors: Vec<CompetitorInfo>,
    /// Market trends relevant to the query.
    pub market_trends: Vec<MarketTrend>,
    /// Strategic recommendations based on the analysis.
    pub recommendations: Vec<String>,
    /// Executive summary of the competitive landscape.
    pub summary: String,
}

impl CompetitiveAnalysis {
    /// Canonical example payload, embedded in the prompt alongside the
    /// schema. Kept here because it is tied to this exact structure.
    pub fn example() -> Self {
        Self {
            competitors: vec![CompetitorInfo {
                name: "ExampleCorp".to_string(),
                strengths: vec!["Large user base".to_string()],
                weaknesses: vec!["Slow innovation".to_string()],
                market_share: Some("Approx. 30%".to_string()),
                key_features: vec!["Core Platform".to_string()],
                pricing: Some("$100/user/month".to_string()),
            }],
            market_trends: vec![MarketTrend {
                trend: "AI Integration".to_string(),
                impact: "Increased demand".to_string(),
                opportunity: Some("Develop AI features.".to_string()),
                threat: Some("Competitors move faster.".to_string()),
            }],
            recommendations: vec![
                "Invest R&D in AI.".to_string(),
                "Simplify pricing.".to_string(),
            ],
            summary: "Market shifting towards AI.".to_string(),
        }
    }
}

/// Classification of a failed analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller supplied a provider id outside the enumerated set.
    InvalidProvider,
    /// Transport failure, timeout, bad envelope, or a self-reported error payload.
    ProviderFailure,
    /// Output was empty or not valid JSON.
    MalformedOutput,
    /// Valid JSON that does not satisfy the analysis schema.
    SchemaMismatch,
}

/// One field-level schema violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// JSON pointer to the offending location ("" for the document root).
    pub field_path: String,
    /// Human-readable description of the violation.
    pub reason: String,
}

/// Final disposition of one analysis request.
///
/// Every failure mode is a value; nothing in the pipeline panics or
/// propagates an error past this type. Consumed once by the presentation
/// layer, never cached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOutcome {
    /// Validated analysis plus the cleaned text it was decoded from.
    Structured {
        data: CompetitiveAnalysis,
        raw: String,
    },
    /// A classified failure with diagnostics for the user or operator.
    Error {
        kind: ErrorKind,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        validation_details: Vec<ValidationDetail>,
    },
}

impl AnalysisOutcome {
    /// Shorthand for an error outcome with no diagnostics attached.
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        AnalysisOutcome::Error {
            kind,
            message: message.into(),
            details: None,
            raw: None,
            validation_details: Vec::new(),
        }
    }

    /// The error classification, if this outcome is a failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AnalysisOutcome::Structured { .. } => None,
            AnalysisOutcome::Error { kind, .. } => Some(*kind),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisOutcome::Error { .. })
    }
}
