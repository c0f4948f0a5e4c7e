use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::error::InferenceError;
use super::model::ProbabilityModel;
use super::types::{ClassifierInput, LocalClassification, Verdict};
use crate::constants::LOCAL_DECISION_BOUNDARY;
use crate::parsing::clamp_unit;

/// Wraps one local probability model call per request and absorbs its failures.
#[derive(Clone)]
pub struct LocalClassifierAdapter {
    model: Option<Arc<dyn ProbabilityModel>>,
    unavailable_reason: String,
}

impl std::fmt::Debug for LocalClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalClassifierAdapter")
            .field("available", &self.is_available())
            .finish()
    }
}

impl LocalClassifierAdapter {
    pub fn new(model: Arc<dyn ProbabilityModel>) -> Self {
        Self {
            model: Some(model),
            unavailable_reason: String::new(),
        }
    }

    /// An adapter without a model; every classification degrades to `Unknown`.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            model: None,
            unavailable_reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    /// Fake probability straight from the model, validated to lie in `[0, 1]`.
    pub fn probability(&self, input: &ClassifierInput) -> Result<f64, InferenceError> {
        let model = self.model.as_ref().ok_or_else(|| InferenceError::ModelNotLoaded {
            reason: self.unavailable_reason.clone(),
        })?;

        let probability = model.predict(input)?;
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(InferenceError::InvalidOutput { value: probability });
        }
        Ok(probability)
    }

    /// Thresholds the fake probability at 0.5. Never fails.
    #[instrument(skip_all, fields(text_len = input.text.len(), image = input.image_available))]
    pub fn classify(&self, input: &ClassifierInput) -> LocalClassification {
        if !input.has_text() {
            debug!("No text for the local classifier");
            return LocalClassification::unknown("No text content for the local classifier");
        }

        match self.probability(input) {
            Ok(probability) => {
                let verdict = if probability >= LOCAL_DECISION_BOUNDARY {
                    Verdict::Fake
                } else {
                    Verdict::Real
                };
                let confidence = clamp_unit(probability.max(1.0 - probability));
                debug!(%verdict, probability, confidence, "Local classification");

                LocalClassification {
                    verdict,
                    confidence,
                    probability: Some(probability),
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "Local classifier unavailable for this request");
                LocalClassification::unknown(e.to_string())
            }
        }
    }
}
