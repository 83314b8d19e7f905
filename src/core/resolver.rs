//! Response resolution: classify raw backend output into a final outcome
//!
//! The resolver implements a strict precedence order over a single decoded
//! value: forwarded dispatcher error, empty output, self-reported error
//! object, schema violation, validated analysis. Every state is terminal;
//! retries, if any, belong to the caller.

use jsonschema::JSONSchema;
use schemars::schema_for;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::{
    AnalysisOutcome, CompetitiveAnalysis, ErrorKind, RawLlmResult, ValidationDetail,
};

/// Resolves dispatcher output against the `CompetitiveAnalysis` schema.
///
/// The schema is derived from the Rust types and compiled once per resolver;
/// construction is infallible for a well-formed type definition.
pub struct ResponseResolver {
    schema: JSONSchema,
}

impl ResponseResolver {
    pub fn new() -> Self {
        let schema = serde_json::to_value(schema_for!(CompetitiveAnalysis))
            .expect("analysis schema serializes to JSON");
        let schema = JSONSchema::compile(&schema).expect("analysis schema compiles");
        Self { schema }
    }

    /// Classify one dispatcher result.
    pub fn resolve(&self, raw: RawLlmResult) -> AnalysisOutcome {
        let text = match raw {
            RawLlmResult::ProviderError { message, details } => {
                // Already classified by the dispatcher; forward unchanged
                return AnalysisOutcome::Error {
                    kind: ErrorKind::ProviderFailure,
                    message,
                    details,
                    raw: None,
                    validation_details: Vec::new(),
                };
            }
            RawLlmResult::Text(text) => text,
        };

        if text.is_empty() {
            return AnalysisOutcome::Error {
                kind: ErrorKind::MalformedOutput,
                message: "model returned an empty response".to_string(),
                details: None,
                raw: Some(text),
                validation_details: Vec::new(),
            };
        }

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(err) => {
                // The expected path for prose or truncated output
                debug!(error = %err, "model output was not valid JSON");
                return AnalysisOutcome::Error {
                    kind: ErrorKind::MalformedOutput,
                    message: format!("model returned invalid JSON: {err}"),
                    details: None,
                    raw: Some(text),
                    validation_details: Vec::new(),
                };
            }
        };

        // A 200-level response can still carry a handled failure encoded as
        // {"error": ..., "details": ...} by the dispatcher layer
        if let Some(reported) = value.as_object().and_then(|map| map.get("error")) {
            let reason = match reported {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let details = value.get("details").cloned();
            return AnalysisOutcome::Error {
                kind: ErrorKind::ProviderFailure,
                message: format!("LLM call failed: {reason}"),
                details,
                raw: Some(text),
                validation_details: Vec::new(),
            };
        }

        let violations = self.validate(&value);
        if !violations.is_empty() {
            warn!(
                violations = violations.len(),
                "model output failed schema validation"
            );
            return AnalysisOutcome::Error {
                kind: ErrorKind::SchemaMismatch,
                message: "model output did not match the expected analysis structure"
                    .to_string(),
                details: None,
                raw: Some(text),
                validation_details: violations,
            };
        }

        match serde_json::from_value::<CompetitiveAnalysis>(value) {
            Ok(data) => AnalysisOutcome::Structured { data, raw: text },
            Err(err) => AnalysisOutcome::Error {
                kind: ErrorKind::SchemaMismatch,
                message: format!("model output could not be decoded: {err}"),
                details: None,
                raw: Some(text),
                validation_details: vec![ValidationDetail {
                    field_path: String::new(),
                    reason: err.to_string(),
                }],
            },
        }
    }

    fn validate(&self, value: &Value) -> Vec<ValidationDetail> {
        match self.schema.validate(value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|err| ValidationDetail {
                    field_path: err.instance_path.to_string(),
                    reason: err.to_string(),
                })
                .collect(),
        }
    }
}

impl Default for ResponseResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolver() -> ResponseResolver {
        ResponseResolver::new()
    }

    fn valid_payload() -> String {
        serde_json::to_string(&CompetitiveAnalysis::example()).unwrap()
    }

    #[test]
    fn dispatcher_error_is_forwarded_unchanged() {
        let outcome = resolver().resolve(RawLlmResult::ProviderError {
            message: "Gemini request timed out".to_string(),
            details: None,
        });
        match outcome {
            AnalysisOutcome::Error { kind, message, .. } => {
                assert_eq!(kind, ErrorKind::ProviderFailure);
                assert_eq!(message, "Gemini request timed out");
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }

    #[test]
    fn empty_text_is_malformed_with_empty_message() {
        let outcome = resolver().resolve(RawLlmResult::Text(String::new()));
        match outcome {
            AnalysisOutcome::Error { kind, message, .. } => {
                assert_eq!(kind, ErrorKind::MalformedOutput);
                assert!(message.contains("empty"));
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_malformed_not_schema_mismatch() {
        let outcome = resolver().resolve(RawLlmResult::Text(
            "{'this': 'is not json'".to_string(),
        ));
        assert_eq!(outcome.kind(), Some(ErrorKind::MalformedOutput));
    }

    #[test]
    fn prose_output_is_malformed() {
        let outcome = resolver().resolve(RawLlmResult::Text(
            "I am sorry, I cannot help with that.".to_string(),
        ));
        assert_eq!(outcome.kind(), Some(ErrorKind::MalformedOutput));
    }

    #[test]
    fn error_object_is_a_provider_failure() {
        let body = json!({ "error": "X", "details": "Y" }).to_string();
        let outcome = resolver().resolve(RawLlmResult::Text(body));
        match outcome {
            AnalysisOutcome::Error {
                kind,
                message,
                details,
                ..
            } => {
                assert_eq!(kind, ErrorKind::ProviderFailure);
                assert!(message.contains('X'));
                assert_eq!(details, Some(Value::String("Y".to_string())));
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }

    #[test]
    fn error_object_without_details_still_classifies() {
        let body = json!({ "error": { "code": 42 } }).to_string();
        let outcome = resolver().resolve(RawLlmResult::Text(body));
        match outcome {
            AnalysisOutcome::Error { kind, message, .. } => {
                assert_eq!(kind, ErrorKind::ProviderFailure);
                assert!(message.contains("42"));
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }

    #[test]
    fn missing_summary_is_a_schema_mismatch_naming_the_field() {
        let body = json!({
            "competitors": [],
            "market_trends": [],
            "recommendations": []
        })
        .to_string();
        let outcome = resolver().resolve(RawLlmResult::Text(body));
        match outcome {
            AnalysisOutcome::Error {
                kind,
                validation_details,
                ..
            } => {
                assert_eq!(kind, ErrorKind::SchemaMismatch);
                assert!(!validation_details.is_empty());
                assert!(validation_details.iter().any(|d| {
                    d.reason.contains("summary") || d.field_path.contains("summary")
                }));
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }

    #[test]
    fn wrong_type_reports_the_field_path() {
        let body = json!({
            "competitors": [{
                "name": "X",
                "strengths": "not a list",
                "weaknesses": [],
                "key_features": []
            }],
            "market_trends": [],
            "recommendations": [],
            "summary": "s"
        })
        .to_string();
        let outcome = resolver().resolve(RawLlmResult::Text(body));
        match outcome {
            AnalysisOutcome::Error {
                kind,
                validation_details,
                ..
            } => {
                assert_eq!(kind, ErrorKind::SchemaMismatch);
                assert!(validation_details
                    .iter()
                    .any(|d| d.field_path.contains("strengths")));
            }
            other => panic!("expected error outcome, got {other:?}"),
        }
    }

    #[test]
    fn valid_payload_is_structured_with_raw_preserved() {
        let body = valid_payload();
        let outcome = resolver().resolve(RawLlmResult::Text(body.clone()));
        match outcome {
            AnalysisOutcome::Structured { data, raw } => {
                assert_eq!(raw, body);
                assert_eq!(data, CompetitiveAnalysis::example());
            }
            other => panic!("expected structured outcome, got {other:?}"),
        }
    }

    #[test]
    fn empty_lists_are_schema_valid() {
        let body = json!({
            "competitors": [],
            "market_trends": [],
            "recommendations": [],
            "summary": "nothing found"
        })
        .to_string();
        let outcome = resolver().resolve(RawLlmResult::Text(body));
        match outcome {
            AnalysisOutcome::Structured { data, .. } => {
                assert!(data.competitors.is_empty());
                assert_eq!(data.summary, "nothing found");
            }
            other => panic!("expected structured outcome, got {other:?}"),
        }
    }

    #[test]
    fn validation_is_idempotent() {
        let r = resolver();
        let first = r.resolve(RawLlmResult::Text(valid_payload()));
        let data = match first {
            AnalysisOutcome::Structured { data, .. } => data,
            other => panic!("expected structured outcome, got {other:?}"),
        };

        // Serialize the validated object and resolve again
        let reserialized = serde_json::to_string(&data).unwrap();
        match r.resolve(RawLlmResult::Text(reserialized)) {
            AnalysisOutcome::Structured { data: again, .. } => assert_eq!(data, again),
            other => panic!("expected structured outcome, got {other:?}"),
        }
    }

    #[test]
    fn null_in_required_field_is_rejected() {
        let body = json!({
            "competitors": [],
            "market_trends": [],
            "recommendations": [],
            "summary": null
        })
        .to_string();
        assert_eq!(
            resolver().resolve(RawLlmResult::Text(body)).kind(),
            Some(ErrorKind::SchemaMismatch)
        );
    }

    #[test]
    fn top_level_array_is_a_schema_mismatch() {
        let outcome = resolver().resolve(RawLlmResult::Text("[1, 2, 3]".to_string()));
        assert_eq!(outcome.kind(), Some(ErrorKind::SchemaMismatch));
    }
}
