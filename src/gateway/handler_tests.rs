use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body, http::Request, http::StatusCode};
use base64::{Engine as _, engine::general_purpose};
use http_body_util::BodyExt;
use tower::ServiceExt;

use super::*;
use crate::classifier::{LocalClassifierAdapter, MockProbabilityModel};
use crate::fusion::WeightConfig;
use crate::judge::{Judge, JudgePool, JudgeSpec, MockJudgeClient, Modality};
use crate::pipeline::DetectionService;

const ADMIN_TOKEN: &str = "test-admin-token";

fn service(probability: f64, judge: Option<MockJudgeClient>) -> DetectionService {
    let local = LocalClassifierAdapter::new(Arc::new(MockProbabilityModel::returning(probability)));
    let pool = judge.map(|client| {
        JudgePool::new(
            vec![Judge::new(
                JudgeSpec::new("mock/judge", Modality::TextImage, 1.0),
                Arc::new(client),
            )],
            Duration::from_secs(5),
            Duration::ZERO,
        )
    });
    DetectionService::new(local, pool, WeightConfig::default()).unwrap()
}

fn router(admin_token: Option<&str>) -> Router {
    let state = HandlerState::new(
        service(0.9, Some(MockJudgeClient::verdict("虚假", 0.8))),
        admin_token.map(str::to_string),
    );
    create_router_with_state(state)
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = router(None)
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CREDENCE_STATUS_HEADER).unwrap(),
        CREDENCE_STATUS_HEALTHY
    );
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn test_ready_reports_components() {
    let response = router(None)
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["components"]["local_model"], "loaded");
    assert_eq!(body["components"]["judges"], 1);
}

#[tokio::test]
async fn test_ready_degraded_without_judges() {
    let state = HandlerState::new(service(0.2, None), None);
    let response = create_router_with_state(state)
        .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["components"]["judges"], 0);
}

#[tokio::test]
async fn test_detection_report_shape() {
    let response = router(None)
        .oneshot(json_request(
            "POST",
            "/v1/detections",
            serde_json::json!({"title": "突发", "content": "某地发生爆炸", "mode": "text"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    assert_eq!(body["result"], "Fake");
    assert_eq!(body["mode"], "text");
    assert!(body["id"].is_string());
    assert!(body["completed_at"].is_string());
    assert_eq!(body["analysis"]["local_model"]["verdict"], "Fake");
    assert_eq!(
        body["analysis"]["llm_verification"]["overall_verdict"],
        "LikelyFake"
    );
    assert_eq!(body["analysis"]["fusion"]["strategy"], "weighted_fusion");
}

#[tokio::test]
async fn test_detection_accepts_data_url_image() {
    let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    let encoded = format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    );

    let response = router(None)
        .oneshot(json_request(
            "POST",
            "/v1/detections",
            serde_json::json!({"content": "", "image_base64": encoded, "mode": "image"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["analysis"]["local_model"]["verdict"], "Unknown");
    assert_eq!(body["analysis"]["fusion"]["strategy"], "external_only");
}

#[tokio::test]
async fn test_detection_rejects_invalid_base64() {
    let response = router(None)
        .oneshot(json_request(
            "POST",
            "/v1/detections",
            serde_json::json!({"content": "claim", "image_base64": "@@not base64@@"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(CREDENCE_STATUS_HEADER).unwrap(),
        "invalid_request"
    );
}

#[tokio::test]
async fn test_detection_rejects_empty_request() {
    let response = router(None)
        .oneshot(json_request(
            "POST",
            "/v1/detections",
            serde_json::json!({"content": "   "}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn test_get_weights() {
    let response = router(None)
        .oneshot(
            Request::get("/v1/settings/weights")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["local_weight"], 0.4);
    assert_eq!(body["fake_threshold"], 0.65);
}

#[tokio::test]
async fn test_put_weights_disabled_without_admin_token() {
    let response = router(None)
        .oneshot(json_request(
            "PUT",
            "/v1/settings/weights",
            serde_json::to_value(WeightConfig::default()).unwrap(),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_weights_requires_token() {
    let mut request = json_request(
        "PUT",
        "/v1/settings/weights",
        serde_json::to_value(WeightConfig::default()).unwrap(),
    );
    request
        .headers_mut()
        .insert("authorization", "Bearer wrong".parse().unwrap());

    let response = router(Some(ADMIN_TOKEN)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_put_weights_updates_policy() {
    let app = router(Some(ADMIN_TOKEN));
    let mut request = json_request(
        "PUT",
        "/v1/settings/weights",
        serde_json::json!({
            "local_model_weight": 0.7,
            "llm_weight": 0.3,
            "fake_threshold": 0.6,
            "real_threshold": 0.4
        }),
    );
    request.headers_mut().insert(
        "authorization",
        format!("Bearer {ADMIN_TOKEN}").parse().unwrap(),
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::get("/v1/settings/weights")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["local_weight"], 0.7);
    assert_eq!(body["real_threshold"], 0.4);
}

#[tokio::test]
async fn test_put_weights_rejects_invalid_policy() {
    let mut request = json_request(
        "PUT",
        "/v1/settings/weights",
        serde_json::json!({
            "local_weight": 0.5,
            "external_weight": 0.5,
            "fake_threshold": 0.4,
            "real_threshold": 0.3
        }),
    );
    request.headers_mut().insert(
        "authorization",
        format!("Bearer {ADMIN_TOKEN}").parse().unwrap(),
    );

    let response = router(Some(ADMIN_TOKEN)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(CREDENCE_STATUS_HEADER).unwrap(),
        "invalid_weights"
    );
}

#[tokio::test]
async fn test_detection_malformed_json_uses_error_shape() {
    let response = router(None)
        .oneshot(
            Request::post("/v1/detections")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(CREDENCE_STATUS_HEADER).unwrap(),
        "invalid_request"
    );
    let body = body_json(response).await;
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request"));
}

#[tokio::test]
async fn test_detection_missing_content_type_uses_error_shape() {
    let response = router(None)
        .oneshot(
            Request::post("/v1/detections")
                .body(Body::from(r#"{"content": "claim"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], 400);
}

#[tokio::test]
async fn test_put_weights_wrong_field_type_uses_error_shape() {
    let mut request = json_request(
        "PUT",
        "/v1/settings/weights",
        serde_json::json!({"local_weight": "heavy"}),
    );
    request.headers_mut().insert(
        "authorization",
        format!("Bearer {ADMIN_TOKEN}").parse().unwrap(),
    );

    let response = router(Some(ADMIN_TOKEN)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers().get(CREDENCE_STATUS_HEADER).unwrap(),
        "invalid_request"
    );
}
