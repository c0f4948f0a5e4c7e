use std::collections::HashMap;

use serde_json::Value;
use serde_json::value::RawValue;
use tracing::{debug, warn};

use super::error::ParseError;
use super::types::{JudgeResponse, JudgeVerdict, clamp_unit};

pub const DEFAULT_VERDICT: &str = "ParsingError";
pub const DEFAULT_CONFIDENCE: f64 = 0.0;
pub const DEFAULT_REASON: &str = "No reason provided";

const VERDICT_FIELD: &str = "verdict";
const CONFIDENCE_FIELD: &str = "confidence";
const REASON_FIELD: &str = "reason";

/// Fake-leaning terms. Checked before [`REAL_TERMS`] so negations such as `不真实` or
/// `untrue` never fall through to a real verdict.
pub const FAKE_TERMS: &[&str] = &[
    "虚假",
    "不实",
    "不真实",
    "伪造",
    "疑似伪造",
    "谣言",
    "假新闻",
    "fake",
    "false",
    "untrue",
    "fabricated",
    "misleading",
];

pub const REAL_TERMS: &[&str] = &[
    "真实", "属实", "可信", "true", "real", "authentic", "genuine", "accurate",
];

/// Refines the fallback bucket only; never outranks the two sets above.
const MIXED_TERMS: &[&str] = &["混合", "mixed", "partially"];

/// Turns a judge's free-text answer into a [`JudgeResponse`].
///
/// Stateless; parsing the same text twice yields equal responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    /// Parses text returned by a judge whose transport call succeeded.
    ///
    /// Malformed JSON is not an error here: it yields `succeeded = false` with verdict
    /// [`JudgeVerdict::ParsingError`] and the raw text kept for audit.
    pub fn parse(judge_id: &str, raw_text: &str) -> JudgeResponse {
        debug!(judge_id, raw_len = raw_text.len(), "Parsing judge response");

        match Self::parse_object(raw_text) {
            Ok(object) => Self::from_object(judge_id, &object),
            Err(e) => {
                warn!(judge_id, error = %e, "Failed to parse judge response as a JSON object");
                JudgeResponse::parsing_error(
                    judge_id,
                    raw_text,
                    format!("Failed to parse LLM response as JSON. {e}"),
                )
            }
        }
    }

    /// Strips surrounding markdown code fences (```` ```json ```` or bare ```` ``` ````).
    pub fn strip_code_fences(raw_text: &str) -> &str {
        let trimmed = raw_text.trim();
        let Some(rest) = trimmed.strip_prefix("```") else {
            return trimmed;
        };
        let rest = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
        rest.strip_suffix("```").unwrap_or(rest).trim()
    }

    /// Reads the top-level JSON object, keeping each field as raw text.
    ///
    /// Field values are not interpreted here, so a number too large for `f64` does not
    /// fail the whole object.
    pub fn parse_object(raw_text: &str) -> Result<HashMap<String, Box<RawValue>>, ParseError> {
        let body = Self::strip_code_fences(raw_text);
        if body.is_empty() {
            return Err(ParseError::Empty);
        }

        let raw: Box<RawValue> = serde_json::from_str(body)?;
        match raw.get().trim_start().chars().next() {
            Some('{') => Ok(serde_json::from_str(raw.get())?),
            first => Err(ParseError::NotAnObject {
                found: json_kind(first),
            }),
        }
    }

    /// Maps a free-text verdict onto the closed verdict set by keyword containment.
    pub fn classify_verdict(verdict: &str) -> JudgeVerdict {
        let lowered = verdict.trim().to_lowercase();
        let compact: String = lowered.chars().filter(|c| !c.is_whitespace()).collect();

        if compact == "parsingerror" {
            return JudgeVerdict::ParsingError;
        }
        if FAKE_TERMS.iter().any(|term| lowered.contains(term)) {
            return JudgeVerdict::Fake;
        }
        if REAL_TERMS.iter().any(|term| lowered.contains(term)) {
            return JudgeVerdict::Real;
        }
        if MIXED_TERMS.iter().any(|term| lowered.contains(term)) {
            return JudgeVerdict::Mixed;
        }
        JudgeVerdict::Uncertain
    }

    fn from_object(judge_id: &str, object: &HashMap<String, Box<RawValue>>) -> JudgeResponse {
        let field = |name: &str| object.get(name).map(|raw| field_value(raw));

        let verdict_text = match field(VERDICT_FIELD) {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => DEFAULT_VERDICT.to_string(),
            Some(other) => other.to_string(),
        };
        let verdict = Self::classify_verdict(&verdict_text);

        let confidence =
            Self::read_confidence(judge_id, object.get(CONFIDENCE_FIELD).map(|raw| &**raw));

        let reason = match field(REASON_FIELD) {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => DEFAULT_REASON.to_string(),
            Some(other) => other.to_string(),
        };

        debug!(
            judge_id,
            verdict_text = %verdict_text,
            verdict = %verdict,
            confidence,
            "Judge response parsed"
        );

        JudgeResponse::success(judge_id, verdict, confidence, reason)
    }

    /// Numeric literals are read from their source text, so one that overflows `f64`
    /// becomes an infinity and clamps like any other out-of-range value.
    fn read_confidence(judge_id: &str, raw: Option<&RawValue>) -> f64 {
        let Some(raw) = raw else {
            return DEFAULT_CONFIDENCE;
        };
        let text = raw.get().trim();

        let parsed = match text.chars().next() {
            Some('n') => return DEFAULT_CONFIDENCE,
            Some('"') => serde_json::from_str::<String>(text)
                .ok()
                .and_then(|s| s.trim().parse::<f64>().ok()),
            Some('-' | '0'..='9') => text.parse::<f64>().ok(),
            _ => None,
        };

        let Some(confidence) = parsed.filter(|c| !c.is_nan()) else {
            warn!(judge_id, value = text, "Non-numeric confidence, using 0.0");
            return DEFAULT_CONFIDENCE;
        };

        if !(0.0..=1.0).contains(&confidence) {
            warn!(judge_id, confidence, "Confidence outside [0, 1], clamping");
        }
        clamp_unit(confidence)
    }
}

/// Interprets one field; a value `serde_json` cannot hold is kept as its source text.
fn field_value(raw: &RawValue) -> Value {
    serde_json::from_str(raw.get()).unwrap_or_else(|_| Value::String(raw.get().to_string()))
}

/// JSON kind of a syntactically valid value, from its first character.
fn json_kind(first: Option<char>) -> &'static str {
    match first {
        Some('n') => "null",
        Some('t' | 'f') => "boolean",
        Some('"') => "string",
        Some('[') => "array",
        Some('{') => "object",
        _ => "number",
    }
}
