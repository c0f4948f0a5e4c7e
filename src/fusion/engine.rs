use tracing::{debug, info};

use super::types::{FusionResult, FusionStrategy, WeightConfig};
use crate::aggregation::{AggregatedJudgement, CategoricalVerdict};
use crate::classifier::{LocalClassification, Verdict};
use crate::constants::SINGLE_SOURCE_PENALTY;
use crate::parsing::clamp_unit;

/// Four-branch merge over which of the two sources is active.
///
/// Pure: the same three inputs always give the same [`FusionResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FusionEngine;

impl FusionEngine {
    pub fn fuse(
        local: &LocalClassification,
        external: &AggregatedJudgement,
        weights: &WeightConfig,
    ) -> FusionResult {
        let external_verdict = external_verdict(external.overall_verdict);
        let local_active = local.is_active();
        let external_active = external_verdict.is_some();

        let mut details = vec![
            format!(
                "local: verdict={} confidence={:.3} active={}",
                local.verdict, local.confidence, local_active
            ),
            format!(
                "external: verdict={} confidence={:.3} active={}",
                external.overall_verdict, external.aggregated_confidence, external_active
            ),
        ];
        if let Some(error) = &local.error {
            details.push(format!("local error: {error}"));
        }
        if let Some(error) = &external.error {
            details.push(format!("external error: {error}"));
        }

        let (final_verdict, confidence, strategy, weighted_score) =
            match (local_active, external_verdict) {
                (true, Some(ext_verdict)) => {
                    let (local_w, external_w) = weights.normalized();
                    let score = local_w * local.verdict.score() + external_w * ext_verdict.score();
                    let weighted_confidence =
                        local_w * local.confidence + external_w * external.aggregated_confidence;

                    details.push(format!(
                        "weights: local={local_w:.3} external={external_w:.3}; \
                         weighted_score={score:.3} weighted_confidence={weighted_confidence:.3}"
                    ));

                    let (verdict, confidence) = if score >= weights.fake_threshold {
                        (Verdict::Fake, (0.5 + (score - 0.5)) * weighted_confidence)
                    } else if score <= weights.real_threshold {
                        (Verdict::Real, (0.5 + (0.5 - score)) * weighted_confidence)
                    } else {
                        details.push(format!(
                            "weighted_score within ({:.3}, {:.3}), no decision",
                            weights.real_threshold, weights.fake_threshold
                        ));
                        (Verdict::Unknown, 0.0)
                    };
                    (verdict, confidence, FusionStrategy::WeightedFusion, Some(score))
                }
                (true, None) => (
                    local.verdict,
                    local.confidence * SINGLE_SOURCE_PENALTY,
                    FusionStrategy::LocalOnly,
                    None,
                ),
                (false, Some(ext_verdict)) => (
                    ext_verdict,
                    external.aggregated_confidence * SINGLE_SOURCE_PENALTY,
                    FusionStrategy::ExternalOnly,
                    None,
                ),
                (false, None) => (Verdict::Unknown, 0.0, FusionStrategy::NoActiveSource, None),
            };

        // An undecided result never carries confidence.
        let final_confidence = if final_verdict == Verdict::Unknown {
            0.0
        } else {
            clamp_unit(confidence)
        };

        details.push(format!("strategy: {strategy}"));
        debug!(details = ?details, "Fusion details");
        info!(
            verdict = %final_verdict,
            confidence = final_confidence,
            strategy = %strategy,
            "Fusion complete"
        );

        FusionResult {
            final_verdict,
            final_confidence,
            strategy,
            weighted_score,
            details,
        }
    }
}

/// Real-or-fake reading of the panel; `None` when the panel is not decisive.
fn external_verdict(verdict: CategoricalVerdict) -> Option<Verdict> {
    match verdict {
        CategoricalVerdict::LikelyFake => Some(Verdict::Fake),
        CategoricalVerdict::LikelyTrue => Some(Verdict::Real),
        _ => None,
    }
}
