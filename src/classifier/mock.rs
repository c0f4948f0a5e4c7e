use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::InferenceError;
use super::model::ProbabilityModel;
use super::types::ClassifierInput;

/// Probability model returning a fixed outcome.
#[derive(Debug, Clone)]
pub struct MockProbabilityModel {
    outcome: Result<f64, String>,
    calls: Arc<AtomicUsize>,
}

impl MockProbabilityModel {
    pub fn returning(probability: f64) -> Self {
        Self {
            outcome: Ok(probability),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fails every prediction with an inference error carrying `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(reason.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProbabilityModel for MockProbabilityModel {
    fn predict(&self, _input: &ClassifierInput) -> Result<f64, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .clone()
            .map_err(|reason| InferenceError::Failed { reason })
    }
}
