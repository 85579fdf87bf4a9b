//! Recover a [`ResearchRecord`] from the engine's final text.
//!
//! Extraction never fails. It tries, in order:
//!
//! 1. each ```` ```json ```` fenced block, first parsable one wins
//! 2. a `{ ... }` span running to the last `}` that mentions `"name"`,
//!    trying each opening brace from the left
//! 3. a degraded record built from the raw text
//!
//! Parsed objects are trusted: missing or mistyped fields are backfilled
//! rather than rejected, and schema violations are only logged.

use crate::record::ResearchRecord;
use jsonschema::Validator;
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;

static FENCED_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```json\s*([\s\S]*?)\s*```").unwrap());

/// Bounds how many inline spans get a full JSON parse.
const MAX_INLINE_CANDIDATES: usize = 64;

static RECORD_SCHEMA: LazyLock<Option<Validator>> = LazyLock::new(|| {
    let string_list = json!({"type": "array", "items": {"type": "string"}});
    let schema = json!({
        "type": "object",
        "required": [
            "name", "tldr", "careerTimeline", "founderHistory",
            "publicPresence", "referralPaths", "redFlags", "interviewQuestions"
        ],
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "tldr": {"type": "string"},
            "careerTimeline": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["years", "company", "role", "companyContext"],
                    "properties": {
                        "years": {"type": "string"},
                        "company": {"type": "string"},
                        "role": {"type": "string"},
                        "companyContext": {"type": "string"}
                    }
                }
            },
            "founderHistory": {"type": "string"},
            "publicPresence": {
                "type": "object",
                "required": ["github", "twitter", "writing", "talks"],
                "properties": {
                    "github": {"type": "string"},
                    "twitter": {"type": "string"},
                    "writing": {"type": "string"},
                    "talks": {"type": "string"}
                }
            },
            "referralPaths": string_list,
            "redFlags": string_list,
            "interviewQuestions": string_list
        }
    });
    match jsonschema::validator_for(&schema) {
        Ok(validator) => Some(validator),
        Err(e) => {
            tracing::error!(error = %e, "invalid research record schema");
            None
        }
    }
});

/// Which extraction step produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Fenced,
    Inline,
    Degraded,
}

/// Extract a research record from engine output.
pub fn extract(text: &str) -> ResearchRecord {
    extract_with_source(text).0
}

/// Like [`extract`], also reporting which step succeeded.
pub fn extract_with_source(text: &str) -> (ResearchRecord, Source) {
    for cap in FENCED_JSON.captures_iter(text) {
        if let Some(record) = cap.get(1).and_then(|m| parse_record(m.as_str())) {
            return (record, Source::Fenced);
        }
    }

    if let Some(record) = inline_candidates(text).find_map(parse_record) {
        return (record, Source::Inline);
    }

    tracing::warn!("could not parse JSON output, creating fallback record");
    (ResearchRecord::degraded(text), Source::Degraded)
}

const NAME_KEY: &str = "\"name\"";

/// Spans from each `{` to the last `}`, for braces that still have a
/// `"name"` key between them and that `}`.
fn inline_candidates(text: &str) -> impl Iterator<Item = &str> {
    let bounds = text
        .rfind('}')
        .and_then(|end| Some((text[..end].rfind(NAME_KEY)?, end)));
    text.match_indices('{')
        .map_while(move |(start, _)| {
            let (last_name, end) = bounds?;
            (start <= last_name).then(|| &text[start..=end])
        })
        .take(MAX_INLINE_CANDIDATES)
}

fn parse_record(candidate: &str) -> Option<ResearchRecord> {
    let value: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "candidate JSON did not parse");
            return None;
        }
    };
    let record = ResearchRecord::from_json(&value)?;

    for violation in schema_violations(&value) {
        tracing::warn!("research record backfilled: {}", violation);
    }
    Some(record)
}

/// Ways a parsed object deviates from the research record schema.
pub fn schema_violations(value: &Value) -> Vec<String> {
    match RECORD_SCHEMA.as_ref() {
        Some(validator) => validator
            .iter_errors(value)
            .map(|e| format!("{e}"))
            .collect(),
        None => Vec::new(),
    }
}
