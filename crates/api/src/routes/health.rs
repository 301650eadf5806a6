use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
///
/// Only the store decides the status. Integrations report whether they are
/// configured; none of them is called.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the store does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub store: StoreHealth,
    pub integrations: Integrations,
}

#[derive(Serialize)]
pub struct StoreHealth {
    pub reachable: bool,
    pub latency_ms: u64,
}

#[derive(Serialize)]
pub struct Integrations {
    pub wechat: bool,
    pub map: bool,
    pub storage: bool,
}

/// GET /health -- 200 when the store answers a ping, 503 otherwise.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let started = Instant::now();
    let ping = playtime_db::health_check(state.store.as_ref()).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    if let Err(e) = &ping {
        tracing::warn!(error = %e, latency_ms, "Store health check failed");
    }
    let reachable = ping.is_ok();

    let (code, status) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        store: StoreHealth {
            reachable,
            latency_ms,
        },
        integrations: Integrations {
            wechat: !state.config.wechat.app_id.is_empty(),
            map: state.geocoder.api_key().is_some(),
            storage: state.storage.is_some(),
        },
    };

    (code, Json(body))
}

/// Mount health check routes (root level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
