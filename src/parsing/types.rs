use serde::{Deserialize, Serialize};

/// Canonical verdict of a single judge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JudgeVerdict {
    Real,
    Fake,
    Uncertain,
    Mixed,
    ParsingError,
    Error,
}

impl JudgeVerdict {
    /// Numeric fake-lean used for averaging (`Real=0`, `Fake=1`, everything else `0.5`).
    pub fn lean(&self) -> f64 {
        match self {
            JudgeVerdict::Real => 0.0,
            JudgeVerdict::Fake => 1.0,
            _ => 0.5,
        }
    }

    /// Returns `true` for the two failure markers.
    pub fn is_failure(&self) -> bool {
        matches!(self, JudgeVerdict::ParsingError | JudgeVerdict::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeVerdict::Real => "Real",
            JudgeVerdict::Fake => "Fake",
            JudgeVerdict::Uncertain => "Uncertain",
            JudgeVerdict::Mixed => "Mixed",
            JudgeVerdict::ParsingError => "ParsingError",
            JudgeVerdict::Error => "Error",
        }
    }
}

impl std::fmt::Display for JudgeVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One judge's answer after parsing.
///
/// Constructors keep `confidence` inside `[0, 1]` and never produce a failed response
/// whose verdict is not a failure marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeResponse {
    pub judge_id: String,
    pub succeeded: bool,
    pub verdict: JudgeVerdict,
    pub confidence: f64,
    pub reason: Option<String>,
    pub raw_text: Option<String>,
    pub error: Option<String>,
}

impl JudgeResponse {
    pub fn success(
        judge_id: impl Into<String>,
        verdict: JudgeVerdict,
        confidence: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            judge_id: judge_id.into(),
            succeeded: true,
            verdict,
            confidence: clamp_unit(confidence),
            reason: Some(reason.into()),
            raw_text: None,
            error: None,
        }
    }

    /// Output that arrived but could not be read as a JSON object.
    pub fn parsing_error(
        judge_id: impl Into<String>,
        raw_text: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            judge_id: judge_id.into(),
            succeeded: false,
            verdict: JudgeVerdict::ParsingError,
            confidence: 0.0,
            reason: None,
            raw_text: Some(raw_text.into()),
            error: Some(error.into()),
        }
    }

    /// Transport-level failure (timeout, non-2xx, network).
    pub fn transport_error(judge_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            judge_id: judge_id.into(),
            succeeded: false,
            verdict: JudgeVerdict::Error,
            confidence: 0.0,
            reason: None,
            raw_text: None,
            error: Some(error.into()),
        }
    }
}

/// Clamps to `[0, 1]`; NaN collapses to `0`.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
