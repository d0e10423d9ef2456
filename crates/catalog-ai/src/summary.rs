//! The structured summary returned for a form.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::client::{ChatClient, ChatMessage};
use crate::error::{AiError, Result};
use crate::pdf::truncate_words;
use crate::prompt::SYSTEM_INSTRUCTIONS;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSummary {
    pub category: String,
    pub coverages: Vec<CoverageSummary>,
    pub general_conditions: Vec<String>,
    pub general_exclusions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CoverageSummary {
    pub coverage_name: String,
    pub perils_covered: Vec<String>,
    pub scope_of_coverage: String,
    /// Free text; models sometimes answer with a list or a number.
    #[serde(deserialize_with = "lenient_text")]
    pub limits: String,
    pub conditions: Vec<String>,
    pub exclusions: Vec<String>,
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    })
}

/// Drops a surrounding Markdown code fence, with or without a language tag.
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parses a model answer into a [`FormSummary`].
pub fn parse_summary(content: &str) -> Result<FormSummary> {
    let json = strip_fence(content);
    serde_json::from_str(json).map_err(|e| AiError::MalformedSummary(e.to_string()))
}

/// Summarizes extracted form text: keeps the first `max_words` words, sends
/// them with the analyst instructions, and parses the reply.
pub fn summarize(client: &dyn ChatClient, text: &str, max_words: usize) -> Result<FormSummary> {
    let snippet = truncate_words(text, max_words);
    if snippet.is_empty() {
        return Err(AiError::EmptyText);
    }
    debug!(words = snippet.split(' ').count(), "summarizing form text");
    let messages = [
        ChatMessage::system(SYSTEM_INSTRUCTIONS.trim()),
        ChatMessage::user(snippet),
    ];
    let content = client.complete(&messages)?;
    parse_summary(&content)
}
