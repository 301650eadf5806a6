//! Integration tests for `/api/v1/token` and `/api/v1/wechat`.
//!
//! The WeChat and map APIs point at a closed local port unless a test serves
//! a local stub of the upstream endpoint it needs.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::extract::Query;
use axum::routing::post;
use axum::{Json, Router};
use common::{body_json, get, post_json, send, spawn_stub, TestOptions};
use serde_json::json;
use std::collections::HashMap;

const BOUNDARY: &str = "playtime-boundary";

fn multipart_request(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/api/v1/wechat/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Test: token endpoint serves the cached token
// ---------------------------------------------------------------------------

#[tokio::test]
async fn token_is_fetched_once_and_cached() {
    let test = common::build_test_app_with(TestOptions::default());

    let first = body_json(get(test.router.clone(), "/api/v1/token").await).await;
    let second = body_json(get(test.router.clone(), "/api/v1/token").await).await;

    assert_eq!(first["data"]["access_token"], "token-1");
    assert_eq!(second["data"]["access_token"], "token-1");
    assert_eq!(first["data"]["expires_in"], 7200);
    assert_eq!(test.tokens.calls(), 1);
}

// ---------------------------------------------------------------------------
// Test: login and phone require a code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_without_code_returns_400() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/wechat/login").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn phone_without_code_returns_400() {
    let app = common::build_test_app();
    let response = post_json(app, "/api/v1/wechat/phone", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_with_unreachable_upstream_returns_502() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/wechat/login?code=abc").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_UNAVAILABLE");
}

// ---------------------------------------------------------------------------
// Test: phone lookup refreshes a rejected token and retries once
// ---------------------------------------------------------------------------

/// Upstream phone endpoint answering `errcode` for `token-1` and success for
/// any other token.
fn phone_upstream(first_token_errcode: i64) -> Router {
    Router::new().route(
        "/wxa/business/getuserphonenumber",
        post(move |Query(params): Query<HashMap<String, String>>| async move {
            if params.get("access_token").map(String::as_str) == Some("token-1") {
                Json(json!({ "errcode": first_token_errcode, "errmsg": "rejected" }))
            } else {
                Json(json!({
                    "errcode": 0,
                    "errmsg": "ok",
                    "phone_info": {
                        "phoneNumber": "+86 13800000000",
                        "purePhoneNumber": "13800000000",
                        "countryCode": "86"
                    }
                }))
            }
        }),
    )
}

#[tokio::test]
async fn phone_retries_with_fresh_token_after_40001() {
    let base_url = spawn_stub(phone_upstream(40001)).await;
    let test = common::build_test_app_with(TestOptions {
        wechat_base_url: Some(base_url),
        ..Default::default()
    });

    let response = post_json(test.router, "/api/v1/wechat/phone", json!({ "code": "abc" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["purePhoneNumber"], "13800000000");
    assert_eq!(json["data"]["countryCode"], "86");
    assert_eq!(test.tokens.calls(), 2);
}

#[tokio::test]
async fn phone_does_not_retry_other_upstream_errors() {
    let base_url = spawn_stub(phone_upstream(40029)).await;
    let test = common::build_test_app_with(TestOptions {
        wechat_base_url: Some(base_url),
        ..Default::default()
    });

    let response = post_json(test.router, "/api/v1/wechat/phone", json!({ "code": "abc" })).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
    assert_eq!(test.tokens.calls(), 1);
}

// ---------------------------------------------------------------------------
// Test: map key and reverse geocoding
// ---------------------------------------------------------------------------

#[tokio::test]
async fn map_key_returns_503_when_unset() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/wechat/map-key").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn map_key_is_served_when_set() {
    let test = common::build_test_app_with(TestOptions {
        map_key: Some("MAP-KEY".into()),
        ..Default::default()
    });
    let response = get(test.router, "/api/v1/wechat/map-key").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["key"], "MAP-KEY");
}

#[tokio::test]
async fn reverse_geocode_validates_coordinates() {
    let app = common::build_test_app();

    let response = get(app.clone(), "/api/v1/wechat/map/reverse-geocode?lat=31.2").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app.clone(), "/api/v1/wechat/map/reverse-geocode?lat=31.2&lng=200").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app, "/api/v1/wechat/map/reverse-geocode?lat=31.2&lng=121.4").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ---------------------------------------------------------------------------
// Test: image upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_stores_image_under_avatar_prefix() {
    let test = common::build_test_app_with(TestOptions {
        with_storage: true,
        ..Default::default()
    });
    let request = multipart_request("file", "cat.png", "image/png", b"\x89PNG fake");
    let response = send(test.router, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let filename = json["data"]["filename"].as_str().unwrap();
    assert!(filename.starts_with("avatar/"));
    assert!(filename.ends_with(".png"));

    let uploads = test.storage.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].2, "image/png");
}

#[tokio::test]
async fn upload_rejects_non_image_types() {
    let test = common::build_test_app_with(TestOptions {
        with_storage: true,
        ..Default::default()
    });
    let request = multipart_request("file", "notes.pdf", "application/pdf", b"%PDF");
    let response = send(test.router, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(test.storage.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn upload_without_file_field_returns_400() {
    let test = common::build_test_app_with(TestOptions {
        with_storage: true,
        ..Default::default()
    });
    let request = multipart_request("avatar", "cat.png", "image/png", b"png");
    let response = send(test.router, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_without_storage_returns_503() {
    let app = common::build_test_app();
    let request = multipart_request("file", "cat.png", "image/png", b"png");
    let response = send(app, request).await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
