#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use playtime_api::config::ServerConfig;
use playtime_api::router::build_app_router;
use playtime_api::state::AppState;
use playtime_cloud::{
    CloudError, GeocoderConfig, ObjectStorage, ReverseGeocoder, StoredObject,
};
use playtime_db::memory::MemoryStore;
use playtime_db::mongo::MongoConfig;
use playtime_wechat::{AccessToken, TokenCache, TokenSource, WechatApi, WechatConfig, WechatError};
use tower::ServiceExt;

/// Nothing listens here; outbound calls fail fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin and a 30-second request
/// timeout. Outbound services point at a closed local port.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        mongo: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "playtime_test".to_string(),
            user: None,
            pass: None,
            timeout: Duration::from_secs(1),
        },
        wechat: WechatConfig {
            app_id: "wx-test".to_string(),
            app_secret: "secret".to_string(),
            base_url: UNREACHABLE.to_string(),
            timeout: Duration::from_secs(1),
        },
        geocoder: GeocoderConfig {
            api_key: None,
            base_url: UNREACHABLE.to_string(),
            timeout: Duration::from_secs(1),
        },
        cos: None,
    }
}

/// Hands out `token-1`, `token-2`, ... and counts fetches.
#[derive(Default)]
pub struct CountingTokenSource {
    pub calls: AtomicUsize,
}

impl CountingTokenSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenSource for CountingTokenSource {
    async fn fetch(&self) -> Result<AccessToken, WechatError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AccessToken {
            access_token: format!("token-{n}"),
            expires_in: 7200,
        })
    }
}

/// Records uploaded keys instead of talking to a bucket.
#[derive(Default)]
pub struct RecordingStorage {
    pub uploads: Mutex<Vec<(String, usize, String)>>,
}

#[async_trait]
impl ObjectStorage for RecordingStorage {
    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, CloudError> {
        self.uploads
            .lock()
            .unwrap()
            .push((key.to_string(), body.len(), content_type.to_string()));
        Ok(StoredObject {
            url: format!("https://bucket.test/{key}"),
            filename: key.to_string(),
        })
    }
}

/// Everything a test may want to inspect behind the router.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<CountingTokenSource>,
    pub storage: Arc<RecordingStorage>,
}

/// Options for [`build_test_app_with`].
#[derive(Default)]
pub struct TestOptions {
    pub map_key: Option<String>,
    pub with_storage: bool,
    /// Point the WeChat client at a local stub instead of a closed port.
    pub wechat_base_url: Option<String>,
}

/// Build the full application router over an empty [`MemoryStore`].
pub fn build_test_app() -> Router {
    build_test_app_with(TestOptions::default()).router
}

/// Build the full application router with all middleware layers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app_with(options: TestOptions) -> TestApp {
    let mut config = test_config();
    config.geocoder.api_key = options.map_key;
    if let Some(base_url) = options.wechat_base_url {
        config.wechat.base_url = base_url;
    }

    let store = Arc::new(MemoryStore::new());
    let source = Arc::new(CountingTokenSource::default());
    let recording = Arc::new(RecordingStorage::default());

    let state = AppState {
        store: store.clone(),
        config: Arc::new(config.clone()),
        tokens: Arc::new(TokenCache::new(source.clone())),
        wechat: Arc::new(WechatApi::new(config.wechat.clone()).unwrap()),
        geocoder: Arc::new(ReverseGeocoder::new(config.geocoder.clone()).unwrap()),
        storage: options
            .with_storage
            .then(|| recording.clone() as Arc<dyn ObjectStorage>),
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        tokens: source,
        storage: recording,
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, body)).await
}

fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid place body at `(lat, lon)`.
pub fn place_body(name: &str, category: &str, lat: f64, lon: f64) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "address": "1 Century Avenue, Pudong",
        "description": format!("{name} for dogs and cats"),
        "category": category,
        "isPetFriendly": true,
        "petSize": ["small", "medium"],
        "petType": ["dog"],
        "zone": ["pudong"],
        "latitude": lat,
        "longitude": lon,
    })
}
