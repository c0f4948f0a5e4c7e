use std::path::Path;

use tokenizers::{Tokenizer, TruncationParams};

use super::error::InferenceError;

/// Loads `tokenizer.json` from a model directory (or an explicit file path) with
/// truncation at `max_len` tokens.
pub fn load_tokenizer(model_path: &Path, max_len: usize) -> Result<Tokenizer, InferenceError> {
    let tokenizer_path = if model_path.is_dir() {
        model_path.join("tokenizer.json")
    } else {
        model_path.to_path_buf()
    };

    let mut tokenizer =
        Tokenizer::from_file(&tokenizer_path).map_err(|e| InferenceError::ModelLoadFailed {
            reason: format!("Failed to load {}: {e}", tokenizer_path.display()),
        })?;

    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_len,
            ..Default::default()
        }))
        .map_err(|e| InferenceError::Tokenization {
            reason: format!("Failed to configure truncation: {e}"),
        })?;

    Ok(tokenizer)
}
