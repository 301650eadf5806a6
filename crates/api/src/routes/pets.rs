use axum::routing::get;
use axum::Router;

use crate::handlers::pet;
use crate::state::AppState;

/// Pet routes mounted at `/pets`.
///
/// ```text
/// GET    /        -> list_pets (?ownerId=)
/// POST   /        -> create_pet
/// GET    /{id}    -> get_pet
/// PUT    /{id}    -> update_pet
/// DELETE /{id}    -> delete_pet
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pet::list_pets).post(pet::create_pet))
        .route(
            "/{id}",
            get(pet::get_pet).put(pet::update_pet).delete(pet::delete_pet),
        )
}
