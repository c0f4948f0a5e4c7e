use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use super::CREDENCE_STATUS_HEADER;
use crate::pipeline::PipelineError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),
}

/// Unreadable bodies (bad JSON, wrong content type, wrong field types) are client errors.
impl From<JsonRejection> for GatewayError {
    fn from(rejection: JsonRejection) -> Self {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, credence_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            GatewayError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            GatewayError::Pipeline(PipelineError::InvalidWeights { .. }) => {
                (StatusCode::BAD_REQUEST, "invalid_weights")
            }
            GatewayError::Pipeline(PipelineError::NoSignalSources) => {
                (StatusCode::SERVICE_UNAVAILABLE, "no_signal_sources")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            CREDENCE_STATUS_HEADER,
            HeaderValue::from_static(credence_status),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
