use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::types::{AggregatedJudgement, CategoricalVerdict};
use crate::constants::{
    DIVERGENCE_STD_DEV, LIKELY_FAKE_LEAN, LIKELY_TRUE_LEAN, MIXED_LEAN_BAND, NEUTRAL_CONFIDENCE,
};
use crate::judge::JudgeSpec;
use crate::parsing::{JudgeResponse, clamp_unit};

/// Folds judge responses using each judge's static reliability weight.
///
/// Decision thresholds are fixed policy; only the per-judge weights are configurable.
#[derive(Debug, Clone, Default)]
pub struct AggregationEngine {
    weights: HashMap<String, f64>,
}

impl AggregationEngine {
    pub fn new(weights: HashMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn from_judges<'a>(specs: impl IntoIterator<Item = &'a JudgeSpec>) -> Self {
        Self::new(
            specs
                .into_iter()
                .map(|spec| (spec.id.clone(), spec.weight))
                .collect(),
        )
    }

    /// Reliability weight of `judge_id`; unknown judges and unusable weights count as `0`.
    pub fn weight_of(&self, judge_id: &str) -> f64 {
        self.weights
            .get(judge_id)
            .copied()
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(0.0)
    }

    pub fn aggregate(&self, responses: Vec<JudgeResponse>) -> AggregatedJudgement {
        if responses.is_empty() {
            info!("No judge responses, aggregation skipped");
            return AggregatedJudgement::skipped("No judge was queried for this input");
        }

        let mut total_weight = 0.0;
        let mut weighted_lean = 0.0;
        let mut weighted_confidence = 0.0;
        let mut confidences = Vec::with_capacity(responses.len());

        for response in responses.iter().filter(|r| r.succeeded) {
            let weight = self.weight_of(&response.judge_id);
            if weight <= 0.0 {
                debug!(judge_id = %response.judge_id, "Judge has no reliability weight, ignored");
                continue;
            }

            let confidence = clamp_unit(response.confidence);
            total_weight += weight;
            weighted_lean += weight * response.verdict.lean();
            weighted_confidence += weight * confidence;
            confidences.push(confidence);
        }

        if total_weight <= 0.0 {
            warn!(
                responses = responses.len(),
                "No successful weighted judge responses, aggregation failed"
            );
            return AggregatedJudgement {
                overall_verdict: CategoricalVerdict::AggregationError,
                aggregated_confidence: NEUTRAL_CONFIDENCE,
                needs_manual_review: false,
                average_lean: None,
                contributing: 0,
                per_judge: responses,
                error: Some("No successful judge response with a positive weight".to_string()),
            };
        }

        let average_lean = weighted_lean / total_weight;
        let aggregated_confidence = clamp_unit(weighted_confidence / total_weight);

        let mut needs_manual_review = false;
        if confidences.len() > 1 {
            let spread = population_std_dev(&confidences);
            if spread > DIVERGENCE_STD_DEV {
                debug!(spread, "Judge confidences diverge, flagging for review");
                needs_manual_review = true;
            }
        }

        let overall_verdict = if average_lean >= LIKELY_FAKE_LEAN {
            CategoricalVerdict::LikelyFake
        } else if average_lean <= LIKELY_TRUE_LEAN {
            CategoricalVerdict::LikelyTrue
        } else if average_lean > MIXED_LEAN_BAND.0 && average_lean < MIXED_LEAN_BAND.1 {
            needs_manual_review = true;
            CategoricalVerdict::UncertainMixed
        } else {
            CategoricalVerdict::Uncertain
        };

        info!(
            verdict = %overall_verdict,
            average_lean,
            aggregated_confidence,
            needs_manual_review,
            contributing = confidences.len(),
            "Judge responses aggregated"
        );

        AggregatedJudgement {
            overall_verdict,
            aggregated_confidence,
            needs_manual_review,
            average_lean: Some(average_lean),
            contributing: confidences.len(),
            per_judge: responses,
            error: None,
        }
    }
}

/// Population standard deviation; `0` for fewer than two values.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
