//! Thin HTTP surface (Axum) over the detection pipeline.
//!
//! Used by the `credence` binary; persistence and accounts live elsewhere.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;

#[cfg(test)]
mod handler_tests;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{detection_handler, get_weights_handler, put_weights_handler};
pub use payload::DetectionPayload;
pub use state::HandlerState;

pub const CREDENCE_STATUS_HEADER: &str = "x-credence-status";
pub const CREDENCE_STATUS_HEALTHY: &str = "healthy";
pub const CREDENCE_STATUS_READY: &str = "ready";
pub const CREDENCE_STATUS_DEGRADED: &str = "degraded";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/detections", post(detection_handler))
        .route(
            "/v1/settings/weights",
            get(get_weights_handler).put(put_weights_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub local_model: &'static str,
    pub judges: usize,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        CREDENCE_STATUS_HEADER,
        HeaderValue::from_static(CREDENCE_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Always `200` once serving: the service refuses to start without a signal source.
/// Reports `degraded` when one of the two sources is missing.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let local_model = state.service.local_model_available();
    let judges = state.service.judge_count();

    let status = if local_model && judges > 0 {
        CREDENCE_STATUS_READY
    } else {
        CREDENCE_STATUS_DEGRADED
    };

    let mut headers = HeaderMap::new();
    headers.insert(CREDENCE_STATUS_HEADER, HeaderValue::from_static(status));

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status,
            components: ComponentStatus {
                local_model: if local_model { "loaded" } else { "unavailable" },
                judges,
            },
        }),
    )
        .into_response()
}
