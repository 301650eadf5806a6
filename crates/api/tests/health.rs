//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get, TestOptions};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health reports a reachable store and the configured integrations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_reports_store_and_integrations() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store"]["reachable"], true);
    assert!(json["store"]["latency_ms"].is_u64());
    assert_eq!(json["integrations"]["wechat"], true);
    assert_eq!(json["integrations"]["map"], false);
    assert_eq!(json["integrations"]["storage"], false);
    assert!(json.get("db_healthy").is_none());
}

#[tokio::test]
async fn health_check_lists_map_and_storage_when_configured() {
    let test = common::build_test_app_with(TestOptions {
        map_key: Some("map-key".to_string()),
        with_storage: true,
        ..TestOptions::default()
    });
    let json = body_json(get(test.router, "/health").await).await;

    assert_eq!(json["integrations"]["map"], true);
    assert_eq!(json["integrations"]["storage"], true);
}

// ---------------------------------------------------------------------------
// Test: An unreachable store turns /health into 503 degraded
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_is_503_when_store_unreachable() {
    let test = common::build_test_app_with(TestOptions::default());
    test.store.set_unreachable(true);

    let response = get(test.router, "/health").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["store"]["reachable"], false);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = common::build_test_app();
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is generated, or echoed when the client sends one
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let app = common::build_test_app();
    let response = get(app, "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "Response must contain an x-request-id header"
    );

    // A UUID: 36 chars with hyphens.
    let id_str = request_id.unwrap().to_str().unwrap();
    assert_eq!(id_str.len(), 36);
}

#[tokio::test]
async fn client_request_id_is_echoed() {
    let app = common::build_test_app();
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "client-chosen-id")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-chosen-id"
    );
}

// ---------------------------------------------------------------------------
// Test: CORS preflight allows the configured origin and no auth header
// ---------------------------------------------------------------------------

fn preflight(origin: &str, headers: &str) -> Request<Body> {
    Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/v1/places")
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", headers)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() {
    let app = common::build_test_app();
    let response = app
        .oneshot(preflight("http://localhost:5173", "content-type"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert!(headers.get("access-control-allow-credentials").is_none());

    let allowed = headers
        .get("access-control-allow-headers")
        .unwrap()
        .to_str()
        .unwrap()
        .to_ascii_lowercase();
    assert!(allowed.contains("content-type"));
    assert!(!allowed.contains("authorization"));
}

#[tokio::test]
async fn cors_wildcard_origin_allows_any() {
    let mut config = common::test_config();
    config.cors_origins = vec!["*".to_string()];
    let layer = playtime_api::router::build_cors_layer(&config);

    let app = axum::Router::new()
        .route("/api/v1/places", axum::routing::post(|| async { "" }))
        .layer(layer);
    let response = app
        .oneshot(preflight("https://anywhere.example", "content-type"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
