use std::time::Duration;
use thiserror::Error;

/// Failure of a single judge call. Recorded on the judge's response, never fatal to the batch.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("judge call timed out after {}s", timeout.as_secs_f64())]
    Timeout { timeout: Duration },

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {reason}")]
    Network { reason: String },

    #[error("invalid response body: {reason}")]
    InvalidBody { reason: String },

    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("provider error: {reason}")]
    Provider { reason: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return TransportError::Status {
                status: status.as_u16(),
                body: err.to_string(),
            };
        }
        if err.is_decode() {
            return TransportError::InvalidBody {
                reason: err.to_string(),
            };
        }
        TransportError::Network {
            reason: err.to_string(),
        }
    }
}

impl From<genai::Error> for TransportError {
    fn from(err: genai::Error) -> Self {
        TransportError::Provider {
            reason: err.to_string(),
        }
    }
}
