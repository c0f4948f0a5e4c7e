use std::path::Path;
use std::sync::Arc;

use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};

use super::error::InferenceError;

const CONFIG_FILE: &str = "config.json";
const WEIGHTS_FILE: &str = "model.safetensors";

/// Encoder prefixes tried in order when locating the BERT body in a checkpoint.
const ENCODER_PREFIXES: &[&str] = &["bert", "roberta"];

struct SingleLogitBert {
    encoder: BertModel,
    head: Linear,
}

impl SingleLogitBert {
    fn load(vb: VarBuilder, config: &Config) -> candle_core::Result<Self> {
        let prefix = ENCODER_PREFIXES
            .iter()
            .find(|p| vb.contains_tensor(&format!("{p}.embeddings.word_embeddings.weight")));

        let encoder = match prefix {
            Some(p) => BertModel::load(vb.pp(*p), config)?,
            None => BertModel::load(vb.clone(), config)?,
        };
        let head = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self { encoder, head })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> candle_core::Result<Tensor> {
        let hidden = self
            .encoder
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        let cls = hidden.i((.., 0, ..))?;
        self.head.forward(&cls)
    }
}

/// BERT sequence classifier with a one-logit head, shared cheaply across threads.
#[derive(Clone)]
pub struct BertSequenceClassifier(Arc<SingleLogitBert>);

impl BertSequenceClassifier {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    pub fn load(model_dir: &Path, device: &Device) -> Result<Self, InferenceError> {
        let config_path = model_dir.join(CONFIG_FILE);
        let weights_path = model_dir.join(WEIGHTS_FILE);

        for required in [&config_path, &weights_path] {
            if !required.exists() {
                return Err(InferenceError::ModelLoadFailed {
                    reason: format!("Missing {}", required.display()),
                });
            }
        }

        let config: Config = serde_json::from_str(&std::fs::read_to_string(&config_path)?)
            .map_err(|e| InferenceError::ModelLoadFailed {
                reason: format!("Failed to parse {CONFIG_FILE}: {e}"),
            })?;

        // SAFETY: the weights file is opened read-only and not modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
            .map_err(|e| InferenceError::ModelLoadFailed {
                reason: e.to_string(),
            })?;

        let model = SingleLogitBert::load(vb, &config).map_err(|e| {
            InferenceError::ModelLoadFailed {
                reason: format!("Failed to build classifier: {e}"),
            }
        })?;

        Ok(Self(Arc::new(model)))
    }

    /// Raw logit tensor of shape `[batch, 1]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor, InferenceError> {
        Ok(self.0.forward(input_ids, token_type_ids, attention_mask)?)
    }
}
