use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use tracing::{info, instrument, warn};

use super::CREDENCE_STATUS_HEADER;
use super::error::GatewayError;
use super::payload::DetectionPayload;
use super::state::HandlerState;
use crate::fusion::WeightConfig;

#[instrument(skip(state, payload))]
pub async fn detection_handler(
    State(state): State<HandlerState>,
    payload: Result<Json<DetectionPayload>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(payload) = payload?;
    let request = payload.into_request()?;
    let report = state.service.detect(request).await;

    let mut headers = HeaderMap::new();
    let status = if report.needs_manual_review {
        "review"
    } else {
        "complete"
    };
    headers.insert(CREDENCE_STATUS_HEADER, HeaderValue::from_static(status));

    Ok((StatusCode::OK, headers, Json(report)).into_response())
}

#[instrument(skip(state))]
pub async fn get_weights_handler(State(state): State<HandlerState>) -> Json<WeightConfig> {
    Json(state.service.weights())
}

#[instrument(skip(state, headers, weights))]
pub async fn put_weights_handler(
    State(state): State<HandlerState>,
    headers: HeaderMap,
    weights: Result<Json<WeightConfig>, JsonRejection>,
) -> Result<Json<WeightConfig>, GatewayError> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err(GatewayError::NotFound(
            "weight updates are disabled".to_string(),
        ));
    };

    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim);

    if presented != Some(expected) {
        warn!("Rejected weight update with missing or wrong token");
        return Err(GatewayError::Unauthorized);
    }

    let Json(weights) = weights?;
    state.service.set_weights(weights)?;
    info!("Fusion weights replaced through the settings endpoint");

    Ok(Json(state.service.weights()))
}
