use std::time::Duration;

use playtime_cloud::geocoder::DEFAULT_MAP_API_BASE;
use playtime_cloud::{CosConfig, GeocoderConfig};
use playtime_db::mongo::MongoConfig;
use playtime_wechat::api::DEFAULT_API_BASE;
use playtime_wechat::WechatConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub mongo: MongoConfig,
    pub wechat: WechatConfig,
    pub geocoder: GeocoderConfig,
    /// Object storage; uploads are refused when unset.
    pub cos: Option<CosConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                      |
    /// |-------------------------|------------------------------|
    /// | `HOST`                  | `0.0.0.0`                    |
    /// | `PORT`                  | `8080`                       |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`      |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                         |
    /// | `MONGO_URI`             | `mongodb://localhost:27017`  |
    /// | `MONGO_DB`              | `playtime`                   |
    /// | `MONGO_USER`            | unset                        |
    /// | `MONGO_PASS`            | unset                        |
    /// | `MONGO_TIMEOUT_SECS`    | `10`                         |
    /// | `WECHAT_APPID`          | empty                        |
    /// | `WECHAT_SECRET`         | empty                        |
    /// | `WECHAT_API_BASE`       | `https://api.weixin.qq.com`  |
    /// | `OUTBOUND_TIMEOUT_SECS` | `10`                         |
    /// | `WECHAT_MINI_MAP_API`   | unset                        |
    /// | `MAP_API_BASE`          | `https://apis.map.qq.com`    |
    /// | `COS_SECRET_ID`         | unset                        |
    /// | `COS_SECRET_KEY`        | unset                        |
    /// | `COS_BUCKET_URL`        | unset                        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = secs_var("REQUEST_TIMEOUT_SECS", 30);
        let outbound_timeout = Duration::from_secs(secs_var("OUTBOUND_TIMEOUT_SECS", 10));

        let mongo = MongoConfig {
            uri: std::env::var("MONGO_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".into()),
            database: std::env::var("MONGO_DB").unwrap_or_else(|_| "playtime".into()),
            user: optional_var("MONGO_USER"),
            pass: optional_var("MONGO_PASS"),
            timeout: Duration::from_secs(secs_var("MONGO_TIMEOUT_SECS", 10)),
        };

        let wechat = WechatConfig {
            app_id: std::env::var("WECHAT_APPID").unwrap_or_default(),
            app_secret: std::env::var("WECHAT_SECRET").unwrap_or_default(),
            base_url: std::env::var("WECHAT_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.into()),
            timeout: outbound_timeout,
        };

        let geocoder = GeocoderConfig {
            api_key: optional_var("WECHAT_MINI_MAP_API"),
            base_url: std::env::var("MAP_API_BASE")
                .unwrap_or_else(|_| DEFAULT_MAP_API_BASE.into()),
            timeout: outbound_timeout,
        };

        let cos = match (
            optional_var("COS_SECRET_ID"),
            optional_var("COS_SECRET_KEY"),
            optional_var("COS_BUCKET_URL"),
        ) {
            (Some(secret_id), Some(secret_key), Some(bucket_url)) => Some(CosConfig {
                secret_id,
                secret_key,
                bucket_url,
            }),
            _ => None,
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            mongo,
            wechat,
            geocoder,
            cos,
        }
    }
}

/// A set, non-blank variable.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn secs_var(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}
