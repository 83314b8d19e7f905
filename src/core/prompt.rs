//! Prompt assembly for the market research agent
//!
//! The system instruction fixes the agent role and the JSON-only output
//! contract. The user prompt embeds the generated schema, one example
//! payload, and the literal user query. Providers treat the JSON request as
//! a hint, not a guarantee; the resolver does the real enforcement.

use schemars::schema_for;

use crate::api::CompetitiveAnalysis;

const QUERY_PLACEHOLDER: &str = "{{user_query}}";

/// Agent role plus the output contract. Sent as the system message to every
/// provider.
pub const SYSTEM_INSTRUCTION: &str = "You are a Competitive Analysis Agent specialized in \
market research and competitor analysis. Analyze the user's query and provide factual, \
structured insight into competitors, market trends, and strategic recommendations. \
CRITICAL: respond ONLY with a single valid JSON object conforming to the provided schema. \
Do not add introductions, explanations, apologies, or markdown fences around the JSON. \
Your entire response must be the JSON object itself.";

/// User-prompt template with the schema and example rendered once; the query
/// is substituted per call.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    user_template: String,
}

impl PromptTemplate {
    pub fn new() -> Self {
        let schema = schema_for!(CompetitiveAnalysis);
        let schema_json =
            serde_json::to_string_pretty(&schema).expect("analysis schema serializes to JSON");
        let example_json = serde_json::to_string_pretty(&CompetitiveAnalysis::example())
            .expect("example payload serializes to JSON");

        let user_template = format!(
            "The response must be formatted according to this JSON Schema:\n\
             {schema_json}\n\n\
             Here is an example of the exact JSON format required:\n\
             {example_json}\n\n\
             Analyze the user query below and return ONLY the valid JSON object \
             matching the schema.\n\
             User Query: {QUERY_PLACEHOLDER}"
        );

        Self { user_template }
    }

    /// Render the user prompt for one query.
    pub fn render(&self, query: &str) -> String {
        self.user_template.replace(QUERY_PLACEHOLDER, query)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new()
    }
}
