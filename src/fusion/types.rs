use serde::{Deserialize, Serialize};

use crate::classifier::Verdict;
use crate::constants::{
    DEFAULT_FAKE_THRESHOLD, DEFAULT_LLM_WEIGHT, DEFAULT_LOCAL_MODEL_WEIGHT, DEFAULT_REAL_THRESHOLD,
};

/// Fusion policy. Weights need not sum to 1; they are normalized when used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    #[serde(alias = "local_model_weight")]
    pub local_weight: f64,
    #[serde(alias = "llm_weight")]
    pub external_weight: f64,
    pub fake_threshold: f64,
    pub real_threshold: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            local_weight: DEFAULT_LOCAL_MODEL_WEIGHT,
            external_weight: DEFAULT_LLM_WEIGHT,
            fake_threshold: DEFAULT_FAKE_THRESHOLD,
            real_threshold: DEFAULT_REAL_THRESHOLD,
        }
    }
}

impl WeightConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (name, weight) in [
            ("local_weight", self.local_weight),
            ("external_weight", self.external_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{name} must be a finite number >= 0, got {weight}"));
            }
        }
        if self.local_weight + self.external_weight <= 0.0 {
            return Err("local_weight + external_weight must be greater than 0".to_string());
        }
        if !(self.fake_threshold > 0.5 && self.fake_threshold < 1.0) {
            return Err(format!(
                "fake_threshold must be in (0.5, 1), got {}",
                self.fake_threshold
            ));
        }
        if !(self.real_threshold > 0.0 && self.real_threshold < 0.5) {
            return Err(format!(
                "real_threshold must be in (0, 0.5), got {}",
                self.real_threshold
            ));
        }
        if self.real_threshold >= self.fake_threshold {
            return Err("real_threshold must be lower than fake_threshold".to_string());
        }
        Ok(())
    }

    /// `(local, external)` weights scaled to sum to 1.
    ///
    /// Falls back to the default split when the configured weights cannot be normalized.
    pub fn normalized(&self) -> (f64, f64) {
        let total = self.local_weight + self.external_weight;
        if !total.is_finite() || total <= 0.0 || self.local_weight < 0.0 || self.external_weight < 0.0
        {
            let defaults = Self::default();
            let total = defaults.local_weight + defaults.external_weight;
            return (defaults.local_weight / total, defaults.external_weight / total);
        }
        (self.local_weight / total, self.external_weight / total)
    }
}

/// Which branch of the fusion policy produced the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionStrategy {
    WeightedFusion,
    LocalOnly,
    ExternalOnly,
    NoActiveSource,
}

impl FusionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FusionStrategy::WeightedFusion => "weighted_fusion",
            FusionStrategy::LocalOnly => "local_only",
            FusionStrategy::ExternalOnly => "external_only",
            FusionStrategy::NoActiveSource => "no_active_source",
        }
    }
}

impl std::fmt::Display for FusionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusionResult {
    pub final_verdict: Verdict,
    pub final_confidence: f64,
    pub strategy: FusionStrategy,
    /// Blended fake score; only set when both sources were active.
    pub weighted_score: Option<f64>,
    /// Audit trail: the branch taken and the inputs it saw.
    pub details: Vec<String>,
}
