use std::path::PathBuf;
use thiserror::Error;

/// Local model failure. Never fatal to a request: the adapter folds it into
/// an `Unknown` classification.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("local model not loaded: {reason}")]
    ModelNotLoaded { reason: String },

    #[error("local model not found at path: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("failed to load local model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("{device} device unavailable: {reason}")]
    DeviceUnavailable { device: String, reason: String },

    #[error("tokenization failed: {reason}")]
    Tokenization { reason: String },

    #[error("unexpected model output shape: {reason}")]
    ShapeMismatch { reason: String },

    #[error("model produced an invalid probability: {value}")]
    InvalidOutput { value: f64 },

    #[error("inference failed: {reason}")]
    Failed { reason: String },

    #[error("inference task failed: {reason}")]
    TaskFailed { reason: String },
}

impl From<candle_core::Error> for InferenceError {
    fn from(err: candle_core::Error) -> Self {
        match err {
            candle_core::Error::ShapeMismatchBinaryOp { .. }
            | candle_core::Error::UnexpectedNumberOfDims { .. }
            | candle_core::Error::UnexpectedShape { .. } => InferenceError::ShapeMismatch {
                reason: err.to_string(),
            },
            other => InferenceError::Failed {
                reason: other.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for InferenceError {
    fn from(err: std::io::Error) -> Self {
        InferenceError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
