use axum::routing::get;
use axum::Router;

use crate::handlers::place;
use crate::state::AppState;

/// Place routes mounted at `/places`.
///
/// ```text
/// GET    /          -> list_places (?category=&limit=)
/// POST   /          -> create_place
/// GET    /search    -> search_places
/// GET    /{id}      -> get_place
/// PUT    /{id}      -> update_place
/// DELETE /{id}      -> delete_place
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(place::list_places).post(place::create_place))
        .route("/search", get(place::search_places))
        .route(
            "/{id}",
            get(place::get_place)
                .put(place::update_place)
                .delete(place::delete_place),
        )
}
