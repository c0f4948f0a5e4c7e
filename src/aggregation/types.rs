use serde::{Deserialize, Serialize};

use crate::parsing::JudgeResponse;

/// Overall verdict of the judge panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoricalVerdict {
    LikelyFake,
    LikelyTrue,
    Uncertain,
    UncertainMixed,
    /// No judge was queried.
    Skipped,
    /// Judges were queried but none produced a usable answer.
    AggregationError,
}

impl CategoricalVerdict {
    /// `true` for the two verdicts that carry a real-or-fake opinion.
    pub fn is_decisive(&self) -> bool {
        matches!(self, CategoricalVerdict::LikelyFake | CategoricalVerdict::LikelyTrue)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoricalVerdict::LikelyFake => "LikelyFake",
            CategoricalVerdict::LikelyTrue => "LikelyTrue",
            CategoricalVerdict::Uncertain => "Uncertain",
            CategoricalVerdict::UncertainMixed => "UncertainMixed",
            CategoricalVerdict::Skipped => "Skipped",
            CategoricalVerdict::AggregationError => "AggregationError",
        }
    }
}

impl std::fmt::Display for CategoricalVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of folding every judge response of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedJudgement {
    pub overall_verdict: CategoricalVerdict,
    /// Weight-normalized mean of contributing judges' confidences, in `[0, 1]`.
    pub aggregated_confidence: f64,
    pub needs_manual_review: bool,
    /// Weight-normalized mean fake-lean; `None` when nothing contributed.
    pub average_lean: Option<f64>,
    /// Number of judges that contributed to the averages.
    pub contributing: usize,
    pub per_judge: Vec<JudgeResponse>,
    pub error: Option<String>,
}

impl AggregatedJudgement {
    /// Judgement for a request on which no judge was queried.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            overall_verdict: CategoricalVerdict::Skipped,
            aggregated_confidence: crate::constants::NEUTRAL_CONFIDENCE,
            needs_manual_review: false,
            average_lean: None,
            contributing: 0,
            per_judge: Vec::new(),
            error: Some(reason.into()),
        }
    }
}
