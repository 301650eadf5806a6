use std::net::SocketAddr;
use std::sync::Arc;

use playtime_api::config::ServerConfig;
use playtime_api::router::build_app_router;
use playtime_api::state::AppState;
use playtime_cloud::{CosStorage, ObjectStorage, ReverseGeocoder};
use playtime_db::geo_search::GeoSearch;
use playtime_db::mongo::MongoStore;
use playtime_db::DbHandle;
use playtime_wechat::{TokenCache, WechatApi};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "playtime_api=debug,playtime_db=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let mongo = MongoStore::connect(&config.mongo)
        .await
        .expect("Failed to connect to MongoDB");
    let store: DbHandle = Arc::new(mongo);

    if let Err(e) = GeoSearch::ensure_geo_index(store.as_ref()).await {
        tracing::warn!(error = %e, "Failed to create location index");
    }

    // --- Outbound clients ---
    let wechat = Arc::new(
        WechatApi::new(config.wechat.clone()).expect("Failed to build WeChat client"),
    );
    let tokens = Arc::new(TokenCache::new(wechat.clone()));
    let geocoder = Arc::new(
        ReverseGeocoder::new(config.geocoder.clone()).expect("Failed to build geocoder client"),
    );

    let storage: Option<Arc<dyn ObjectStorage>> = match &config.cos {
        Some(cos) => {
            let storage = CosStorage::new(cos).expect("Invalid COS_BUCKET_URL");
            tracing::info!(bucket = %storage.location().bucket, "Object storage configured");
            Some(Arc::new(storage))
        }
        None => {
            tracing::warn!("COS credentials not set, uploads are disabled");
            None
        }
    };

    // --- App state ---
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        tokens,
        wechat,
        geocoder,
        storage,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
