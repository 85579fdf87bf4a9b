//! The structured research dossier.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name used when the engine's output names nobody. Also fills fields the
/// engine said nothing about.
pub const UNKNOWN: &str = "Unknown";

/// Public-presence value for a channel the engine searched without success.
pub const NOT_FOUND: &str = "Not found";

/// The single red flag of a parsed record whose `redFlags` was missing.
pub const RED_FLAGS_NOT_REPORTED: &str = "Red flags not reported";

/// Founder history of a degraded record.
pub const UNPARSED_FOUNDER_HISTORY: &str = "Could not parse structured output";

/// The single red flag of a degraded record.
pub const UNPARSED_WARNING: &str =
    "Warning: Research output could not be parsed into structured format";

/// How much raw engine text a degraded record keeps as its summary.
pub const DEGRADED_TLDR_CHARS: usize = 500;

/// One role in the candidate's career.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareerRole {
    pub years: String,
    pub company: String,
    pub role: String,
    pub company_context: String,
}

/// What the engine found on each public channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicPresence {
    pub github: String,
    pub twitter: String,
    pub writing: String,
    pub talks: String,
}

impl PublicPresence {
    fn all(value: &str) -> Self {
        Self {
            github: value.to_string(),
            twitter: value.to_string(),
            writing: value.to_string(),
            talks: value.to_string(),
        }
    }
}

impl Default for PublicPresence {
    fn default() -> Self {
        Self::all(NOT_FOUND)
    }
}

/// Complete research output for a candidate.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchRecord {
    pub name: String,
    pub tldr: String,
    pub career_timeline: Vec<CareerRole>,
    pub founder_history: String,
    pub public_presence: PublicPresence,
    pub referral_paths: Vec<String>,
    /// Empty means the engine found no red flags, not that it didn't look.
    pub red_flags: Vec<String>,
    pub interview_questions: Vec<String>,
}

impl Default for ResearchRecord {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            tldr: String::new(),
            career_timeline: Vec::new(),
            founder_history: String::new(),
            public_presence: PublicPresence::default(),
            referral_paths: Vec::new(),
            red_flags: Vec::new(),
            interview_questions: Vec::new(),
        }
    }
}

impl ResearchRecord {
    /// Build the record used when the engine's output could not be parsed.
    ///
    /// The raw text survives only as a truncated summary.
    pub fn degraded(raw: &str) -> Self {
        Self {
            name: UNKNOWN.to_string(),
            tldr: raw.chars().take(DEGRADED_TLDR_CHARS).collect(),
            career_timeline: Vec::new(),
            founder_history: UNPARSED_FOUNDER_HISTORY.to_string(),
            public_presence: PublicPresence::all(UNKNOWN),
            referral_paths: Vec::new(),
            red_flags: vec![UNPARSED_WARNING.to_string()],
            interview_questions: Vec::new(),
        }
    }

    /// Build a record from a parsed JSON object, backfilling every missing,
    /// `null` or wrong-typed field.
    ///
    /// Fields whose absence would read as a finding are not left empty: an
    /// unreported `redFlags` becomes [`RED_FLAGS_NOT_REPORTED`] and an
    /// unreported public-presence channel becomes [`UNKNOWN`].
    ///
    /// Returns `None` if `value` is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let name = text(obj, "name")
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string());

        let public_presence = match obj.get("publicPresence").and_then(Value::as_object) {
            Some(p) => PublicPresence {
                github: text(p, "github").unwrap_or_else(|| UNKNOWN.to_string()),
                twitter: text(p, "twitter").unwrap_or_else(|| UNKNOWN.to_string()),
                writing: text(p, "writing").unwrap_or_else(|| UNKNOWN.to_string()),
                talks: text(p, "talks").unwrap_or_else(|| UNKNOWN.to_string()),
            },
            None => PublicPresence::all(UNKNOWN),
        };

        let red_flags = match obj.get("redFlags").and_then(Value::as_array) {
            Some(flags) => flags.iter().filter_map(scalar_text).collect(),
            None => vec![RED_FLAGS_NOT_REPORTED.to_string()],
        };

        let career_timeline = obj
            .get("careerTimeline")
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|r| CareerRole {
                        years: text(r, "years").unwrap_or_default(),
                        company: text(r, "company").unwrap_or_default(),
                        role: text(r, "role").unwrap_or_default(),
                        company_context: text(r, "companyContext").unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            name,
            tldr: text(obj, "tldr").unwrap_or_default(),
            career_timeline,
            founder_history: text(obj, "founderHistory").unwrap_or_default(),
            public_presence,
            referral_paths: texts(obj, "referralPaths"),
            red_flags,
            interview_questions: texts(obj, "interviewQuestions"),
        })
    }
}

/// A string field; numbers and booleans are kept as their JSON text.
fn text(obj: &Map<String, Value>, key: &str) -> Option<String> {
    scalar_text(obj.get(key)?)
}

fn texts(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(scalar_text).collect())
        .unwrap_or_default()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
