use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::error::PipelineError;
use super::types::{Analysis, DetectionReport, DetectionRequest};
use crate::aggregation::{AggregatedJudgement, AggregationEngine};
use crate::classifier::{ClassifierInput, InferenceError, LocalClassification, LocalClassifierAdapter};
use crate::fusion::{FusionEngine, WeightConfig};
use crate::judge::JudgePool;

/// Runs one detection end to end.
///
/// The local classifier (on a blocking thread) and the judge fan-out run concurrently and
/// share nothing; fusion waits for both.
#[derive(Debug, Clone)]
pub struct DetectionService {
    local: LocalClassifierAdapter,
    judges: Option<Arc<JudgePool>>,
    aggregation: AggregationEngine,
    weights: Arc<RwLock<WeightConfig>>,
}

impl DetectionService {
    /// Fails only when neither signal source exists.
    pub fn new(
        local: LocalClassifierAdapter,
        judges: Option<JudgePool>,
        weights: WeightConfig,
    ) -> Result<Self, PipelineError> {
        let judges = judges.filter(|pool| !pool.is_empty());
        if !local.is_available() && judges.is_none() {
            return Err(PipelineError::NoSignalSources);
        }

        let aggregation = judges
            .as_ref()
            .map(|pool| AggregationEngine::from_judges(pool.specs()))
            .unwrap_or_default();

        info!(
            local_model = local.is_available(),
            judges = judges.as_ref().map_or(0, |pool| pool.len()),
            "Detection service ready"
        );

        Ok(Self {
            local,
            judges: judges.map(Arc::new),
            aggregation,
            weights: Arc::new(RwLock::new(weights)),
        })
    }

    pub fn local_model_available(&self) -> bool {
        self.local.is_available()
    }

    pub fn judge_count(&self) -> usize {
        self.judges.as_ref().map_or(0, |pool| pool.len())
    }

    /// Current fusion policy.
    pub fn weights(&self) -> WeightConfig {
        *self.weights.read()
    }

    /// Replaces the fusion policy for subsequent requests.
    pub fn set_weights(&self, weights: WeightConfig) -> Result<(), PipelineError> {
        weights
            .validate()
            .map_err(|reason| PipelineError::InvalidWeights { reason })?;
        *self.weights.write() = weights;
        info!(?weights, "Fusion weights updated");
        Ok(())
    }

    #[instrument(skip_all, fields(mode = ?request.mode))]
    pub async fn detect(&self, request: DetectionRequest) -> DetectionReport {
        let id = Uuid::new_v4();
        let weights = self.weights();

        let text = request.subject_text();
        let image = request.subject_image();
        info!(
            %id,
            text_len = text.len(),
            has_image = image.is_some(),
            "Starting detection"
        );

        let local_input = ClassifierInput::new(text.clone(), image.is_some());
        let adapter = self.local.clone();
        let local_task = tokio::task::spawn_blocking(move || adapter.classify(&local_input));

        let judge_text = (!text.is_empty()).then_some(text.as_str());
        let judge_task = async {
            match &self.judges {
                Some(pool) => {
                    let responses = pool.query(judge_text, image).await;
                    self.aggregation.aggregate(responses)
                }
                None => AggregatedJudgement::skipped("Judge verification is not configured"),
            }
        };

        let (local_outcome, llm_verification) = tokio::join!(local_task, judge_task);

        let local_model = local_outcome.unwrap_or_else(|e| {
            let err = InferenceError::TaskFailed {
                reason: e.to_string(),
            };
            warn!(error = %err, "Local classifier task failed");
            LocalClassification::unknown(err.to_string())
        });

        let fusion = FusionEngine::fuse(&local_model, &llm_verification, &weights);

        info!(
            %id,
            result = %fusion.final_verdict,
            confidence = fusion.final_confidence,
            strategy = %fusion.strategy,
            needs_manual_review = llm_verification.needs_manual_review,
            "Detection complete"
        );

        DetectionReport {
            id,
            result: fusion.final_verdict,
            confidence: fusion.final_confidence,
            needs_manual_review: llm_verification.needs_manual_review,
            mode: request.mode,
            analysis: Analysis {
                local_model,
                llm_verification,
                fusion,
            },
            completed_at: chrono::Utc::now(),
        }
    }
}
