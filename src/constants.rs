//! Cross-cutting, shared constants.
//!
//! Policy defaults live here so the config layer, the engines and the tests agree on a
//! single source. Runtime overrides flow through [`crate::fusion::WeightConfig`] and
//! [`crate::config::Config`]; nothing reads these as ambient state at decision time.

use crate::judge::{JudgeSpec, Modality};

pub const DEFAULT_LOCAL_MODEL_WEIGHT: f64 = 0.4;
pub const DEFAULT_LLM_WEIGHT: f64 = 0.6;
pub const DEFAULT_FAKE_THRESHOLD: f64 = 0.65;
pub const DEFAULT_REAL_THRESHOLD: f64 = 0.35;

/// Confidence multiplier applied when only one signal source is active.
pub const SINGLE_SOURCE_PENALTY: f64 = 0.8;

/// Local model decision boundary on the fake probability.
pub const LOCAL_DECISION_BOUNDARY: f64 = 0.5;

pub const LIKELY_FAKE_LEAN: f64 = 0.75;
pub const LIKELY_TRUE_LEAN: f64 = 0.25;
/// Open interval `(low, high)` of average lean flagged as mixed signals.
pub const MIXED_LEAN_BAND: (f64, f64) = (0.4, 0.6);
/// Population std-dev of judge confidences above which review is requested.
pub const DIVERGENCE_STD_DEV: f64 = 0.25;
/// Aggregated confidence reported when no judge contributed.
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

pub const DEFAULT_JUDGE_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_JUDGE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_JUDGE_STAGGER_MS: u64 = 50;
/// Upper bound on the launch stagger between two consecutive judges.
pub const MAX_JUDGE_STAGGER_MS: u64 = 5_000;
pub const DEFAULT_SITE_URL: &str = "http://localhost";
pub const DEFAULT_SITE_NAME: &str = "credence";

pub const JUDGE_MAX_TOKENS: u32 = 700;
pub const JUDGE_TEMPERATURE: f64 = 0.3;

/// Max sequence length fed to the local classifier.
pub const CLASSIFIER_MAX_SEQ_LEN: usize = 512;

/// The judge roster used when `CREDENCE_JUDGES` is not set.
pub fn default_judges() -> Vec<JudgeSpec> {
    vec![
        JudgeSpec::new("perplexity/sonar-reasoning-pro", Modality::Text, 0.4),
        JudgeSpec::new("perplexity/sonar", Modality::Text, 0.2),
        JudgeSpec::new("google/gemini-2.0-flash-001", Modality::TextImage, 0.15),
        JudgeSpec::new("deepseek/deepseek-r1", Modality::Text, 0.15),
        JudgeSpec::new("deepseek/deepseek-chat-v3-0324", Modality::Text, 0.1),
    ]
}
