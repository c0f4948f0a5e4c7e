use super::*;
use crate::constants::default_judges;
use crate::judge::{JudgeSpec, Modality};
use crate::parsing::{JudgeResponse, JudgeVerdict};

fn engine(weights: &[(&str, f64)]) -> AggregationEngine {
    let specs: Vec<JudgeSpec> = weights
        .iter()
        .map(|(id, w)| JudgeSpec::new(*id, Modality::Text, *w))
        .collect();
    AggregationEngine::from_judges(&specs)
}

fn ok(id: &str, verdict: JudgeVerdict, confidence: f64) -> JudgeResponse {
    JudgeResponse::success(id, verdict, confidence, "test")
}

#[test]
fn test_empty_input_is_skipped() {
    let result = engine(&[("a", 1.0)]).aggregate(Vec::new());

    assert_eq!(result.overall_verdict, CategoricalVerdict::Skipped);
    assert_eq!(result.aggregated_confidence, 0.5);
    assert!(!result.needs_manual_review);
    assert!(result.per_judge.is_empty());
}

#[test]
fn test_all_failed_is_aggregation_error() {
    let responses = vec![
        JudgeResponse::transport_error("a", "judge call timed out after 60s"),
        JudgeResponse::parsing_error("b", "garbage", "bad json"),
    ];

    let result = engine(&[("a", 0.5), ("b", 0.5)]).aggregate(responses);

    assert_eq!(result.overall_verdict, CategoricalVerdict::AggregationError);
    assert_eq!(result.aggregated_confidence, 0.5);
    assert_eq!(result.per_judge.len(), 2);
    assert!(result.error.is_some());
}

#[test]
fn test_zero_weight_judges_do_not_contribute() {
    let responses = vec![ok("weighted", JudgeVerdict::Real, 0.9), ok("unweighted", JudgeVerdict::Fake, 0.1)];

    let result = engine(&[("weighted", 1.0), ("unweighted", 0.0)]).aggregate(responses);

    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyTrue);
    assert_eq!(result.contributing, 1);
    assert!((result.aggregated_confidence - 0.9).abs() < 1e-12);
}

#[test]
fn test_unknown_judge_only_is_aggregation_error() {
    let result = engine(&[("a", 1.0)]).aggregate(vec![ok("stranger", JudgeVerdict::Fake, 0.9)]);

    assert_eq!(result.overall_verdict, CategoricalVerdict::AggregationError);
}

#[test]
fn test_weighted_fake_majority() {
    let responses = vec![
        ok("a", JudgeVerdict::Fake, 0.9),
        ok("b", JudgeVerdict::Fake, 0.7),
        ok("c", JudgeVerdict::Real, 0.6),
    ];

    // lean = (0.5*1 + 0.3*1 + 0.2*0) / 1.0 = 0.8
    let result = engine(&[("a", 0.5), ("b", 0.3), ("c", 0.2)]).aggregate(responses);

    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyFake);
    assert!((result.average_lean.unwrap() - 0.8).abs() < 1e-12);
    assert!((result.aggregated_confidence - 0.78).abs() < 1e-12);
    assert!(!result.needs_manual_review);
}

#[test]
fn test_weights_need_not_sum_to_one() {
    let responses = vec![ok("a", JudgeVerdict::Real, 0.8), ok("b", JudgeVerdict::Real, 0.6)];

    let result = engine(&[("a", 3.0), ("b", 1.0)]).aggregate(responses);

    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyTrue);
    assert!((result.aggregated_confidence - 0.75).abs() < 1e-12);
}

#[test]
fn test_mixed_band_flags_review() {
    let responses = vec![ok("a", JudgeVerdict::Fake, 0.6), ok("b", JudgeVerdict::Real, 0.6)];

    let result = engine(&[("a", 0.5), ("b", 0.5)]).aggregate(responses);

    assert_eq!(result.overall_verdict, CategoricalVerdict::UncertainMixed);
    assert!(result.needs_manual_review);
}

#[test]
fn test_uncertain_between_bands() {
    // lean = 0.7*1 + 0.3*0 = 0.7: above the mixed band, below likely-fake
    let responses = vec![ok("a", JudgeVerdict::Fake, 0.5), ok("b", JudgeVerdict::Real, 0.5)];

    let result = engine(&[("a", 0.7), ("b", 0.3)]).aggregate(responses);

    assert_eq!(result.overall_verdict, CategoricalVerdict::Uncertain);
    assert!(!result.needs_manual_review);
}

#[test]
fn test_threshold_boundaries_are_inclusive() {
    let exactly_fake = vec![ok("a", JudgeVerdict::Fake, 0.5), ok("b", JudgeVerdict::Uncertain, 0.5)];
    let result = engine(&[("a", 0.5), ("b", 0.5)]).aggregate(exactly_fake);
    assert_eq!(result.average_lean, Some(0.75));
    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyFake);

    let exactly_true = vec![ok("a", JudgeVerdict::Real, 0.5), ok("b", JudgeVerdict::Mixed, 0.5)];
    let result = engine(&[("a", 0.5), ("b", 0.5)]).aggregate(exactly_true);
    assert_eq!(result.average_lean, Some(0.25));
    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyTrue);
}

#[test]
fn test_divergent_confidences_flag_review() {
    let responses = vec![
        ok("a", JudgeVerdict::Fake, 0.9),
        ok("b", JudgeVerdict::Fake, 0.1),
        ok("c", JudgeVerdict::Fake, 0.9),
        ok("d", JudgeVerdict::Fake, 0.1),
    ];

    let result = engine(&[("a", 0.25), ("b", 0.25), ("c", 0.25), ("d", 0.25)]).aggregate(responses);

    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyFake);
    assert!(result.needs_manual_review);
}

#[test]
fn test_single_judge_never_divergent() {
    let result = engine(&[("a", 1.0)]).aggregate(vec![ok("a", JudgeVerdict::Real, 0.1)]);

    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyTrue);
    assert!(!result.needs_manual_review);
}

#[test]
fn test_failed_responses_kept_for_audit() {
    let responses = vec![
        ok("a", JudgeVerdict::Real, 0.8),
        JudgeResponse::transport_error("b", "HTTP 500"),
    ];

    let result = engine(&[("a", 0.5), ("b", 0.5)]).aggregate(responses);

    assert_eq!(result.per_judge.len(), 2);
    assert_eq!(result.contributing, 1);
    assert_eq!(result.overall_verdict, CategoricalVerdict::LikelyTrue);
}

#[test]
fn test_deterministic() {
    let responses = vec![
        ok("perplexity/sonar", JudgeVerdict::Fake, 0.83),
        ok("deepseek/deepseek-r1", JudgeVerdict::Mixed, 0.41),
        ok("perplexity/sonar-reasoning-pro", JudgeVerdict::Real, 0.67),
    ];
    let engine = AggregationEngine::from_judges(&default_judges());

    let first = engine.aggregate(responses.clone());
    let second = engine.aggregate(responses);

    assert_eq!(first, second);
}

#[test]
fn test_population_std_dev() {
    assert_eq!(population_std_dev(&[]), 0.0);
    assert_eq!(population_std_dev(&[0.7]), 0.0);
    assert!((population_std_dev(&[0.9, 0.1, 0.9, 0.1]) - 0.4).abs() < 1e-12);
}

#[test]
fn test_is_decisive() {
    assert!(CategoricalVerdict::LikelyFake.is_decisive());
    assert!(CategoricalVerdict::LikelyTrue.is_decisive());
    assert!(!CategoricalVerdict::UncertainMixed.is_decisive());
    assert!(!CategoricalVerdict::Skipped.is_decisive());
}
