pub mod health;
pub mod pets;
pub mod places;
pub mod reviews;
pub mod users;
pub mod wechat;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /token                                  current access token
///
/// /wechat/login                           login code exchange
/// /wechat/phone                           phone number lookup (POST)
/// /wechat/map-key                         map SDK key
/// /wechat/map/reverse-geocode             reverse geocoding
/// /wechat/upload                          image upload (POST, multipart)
///
/// /users                                  upsert (POST), lookup or list (GET)
/// /users/openid/{open_id}                 lookup by openId
///
/// /pets                                   create, list
/// /pets/{id}                              get, update, delete
///
/// /places                                 create, list
/// /places/search                          nearby search
/// /places/{id}                            get, update, delete
///
/// /reviews                                create, list
/// /reviews/{id}                           get, update, delete
/// /reviews/user/{user_id}                 list, delete all by user
/// /reviews/place/{place_id}               list, delete all of place
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/token", get(handlers::token::get_token))
        .nest("/wechat", wechat::router())
        .nest("/users", users::router())
        .nest("/pets", pets::router())
        .nest("/places", places::router())
        .nest("/reviews", reviews::router())
}
