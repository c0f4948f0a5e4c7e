use thiserror::Error;

/// Reasons a judge's raw text could not be turned into a structured answer.
///
/// These never escape the parser; they are rendered into
/// [`JudgeResponse::error`](super::JudgeResponse) for audit.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty response")]
    Empty,

    #[error("JSONDecodeError: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid JSON structure: expected an object, got {found}")]
    NotAnObject { found: &'static str },
}
