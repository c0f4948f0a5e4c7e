use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::bert::BertSequenceClassifier;
use super::config::ClassifierConfig;
use super::device::select_device;
use super::error::InferenceError;
use super::tokenizer::load_tokenizer;
use super::types::ClassifierInput;

/// A pre-loaded model producing the probability that the input is fabricated.
///
/// Implementations are synchronous and CPU/GPU bound; async callers run them on a
/// blocking thread.
pub trait ProbabilityModel: Send + Sync {
    fn predict(&self, input: &ClassifierInput) -> Result<f64, InferenceError>;
}

/// Fine-tuned BERT fake-news classifier: one logit, `sigmoid(logit)` is the fake probability.
pub struct BertFakeNewsModel {
    device: Device,
    model: BertSequenceClassifier,
    tokenizer: Tokenizer,
}

impl std::fmt::Debug for BertFakeNewsModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BertFakeNewsModel")
            .field("device", &format!("{:?}", self.device))
            .finish()
    }
}

impl BertFakeNewsModel {
    pub fn load(config: &ClassifierConfig) -> Result<Self, InferenceError> {
        config
            .validate()
            .map_err(|reason| InferenceError::ModelLoadFailed { reason })?;

        let Some(model_path) = config.model_path.as_deref() else {
            return Err(InferenceError::ModelNotLoaded {
                reason: "no model path configured".to_string(),
            });
        };
        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound {
                path: model_path.to_path_buf(),
            });
        }

        let device = select_device();
        info!(
            model_path = %model_path.display(),
            device = ?device,
            "Loading local classifier"
        );

        let model = BertSequenceClassifier::load(model_path, &device)?;
        let tokenizer = load_tokenizer(model_path, config.max_seq_len)?;

        info!("Local classifier loaded");

        Ok(Self {
            device,
            model,
            tokenizer,
        })
    }

    fn row_tensor(&self, values: &[u32]) -> Result<Tensor, InferenceError> {
        Ok(Tensor::new(values, &self.device)?.unsqueeze(0)?)
    }
}

impl ProbabilityModel for BertFakeNewsModel {
    fn predict(&self, input: &ClassifierInput) -> Result<f64, InferenceError> {
        let encoding = self
            .tokenizer
            .encode(input.text.as_str(), true)
            .map_err(|e| InferenceError::Tokenization {
                reason: e.to_string(),
            })?;

        let input_ids = self.row_tensor(encoding.get_ids())?;
        let type_ids = self.row_tensor(encoding.get_type_ids())?;
        let attention_mask = self.row_tensor(encoding.get_attention_mask())?;

        let logits = self
            .model
            .forward(&input_ids, &type_ids, &attention_mask)?
            .flatten_all()?
            .to_vec1::<f32>()?;

        let [logit] = logits.as_slice() else {
            return Err(InferenceError::ShapeMismatch {
                reason: format!("expected a single logit, got {}", logits.len()),
            });
        };

        let probability = sigmoid(f64::from(*logit));
        debug!(
            tokens = encoding.get_ids().len(),
            logit = *logit,
            probability,
            "Local classifier prediction"
        );
        Ok(probability)
    }
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
