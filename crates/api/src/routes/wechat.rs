use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use playtime_cloud::storage::MAX_UPLOAD_BYTES;

use crate::handlers::wechat;
use crate::state::AppState;

/// Room for multipart boundaries and part headers around the file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// WeChat integration routes mounted at `/wechat`.
///
/// ```text
/// GET    /login                  -> login (?code=)
/// POST   /phone                  -> phone_number
/// GET    /map-key                -> map_key
/// GET    /map/reverse-geocode    -> reverse_geocode (?lat=&lng=)
/// POST   /upload                 -> upload_image (multipart `file`)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(wechat::login))
        .route("/phone", post(wechat::phone_number))
        .route("/map-key", get(wechat::map_key))
        .route("/map/reverse-geocode", get(wechat::reverse_geocode))
        .route(
            "/upload",
            post(wechat::upload_image)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD)),
        )
}
