use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// User routes mounted at `/users`.
///
/// ```text
/// POST   /                  -> upsert_user
/// GET    /                  -> get_users (?id= | ?phone= | list)
/// GET    /openid/{open_id}  -> get_user_by_open_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::get_users).post(user::upsert_user))
        .route("/openid/{open_id}", get(user::get_user_by_open_id))
}
