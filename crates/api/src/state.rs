use std::sync::Arc;

use playtime_cloud::{ObjectStorage, ReverseGeocoder};
use playtime_db::DbHandle;
use playtime_wechat::{TokenCache, WechatApi};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Document store.
    pub store: DbHandle,
    pub config: Arc<ServerConfig>,
    /// Process-wide WeChat access token.
    pub tokens: Arc<TokenCache>,
    pub wechat: Arc<WechatApi>,
    pub geocoder: Arc<ReverseGeocoder>,
    /// `None` when COS credentials are not configured.
    pub storage: Option<Arc<dyn ObjectStorage>>,
}
