use axum::routing::get;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

/// Review routes mounted at `/reviews`.
///
/// ```text
/// GET    /                    -> list_reviews (?placeId=&userId=&rating=&limit=)
/// POST   /                    -> create_review
/// GET    /{id}                -> get_review
/// PUT    /{id}                -> update_review
/// DELETE /{id}                -> delete_review
/// GET    /user/{user_id}      -> list_user_reviews
/// DELETE /user/{user_id}      -> delete_user_reviews
/// GET    /place/{place_id}    -> list_place_reviews
/// DELETE /place/{place_id}    -> delete_place_reviews
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(review::list_reviews).post(review::create_review))
        .route(
            "/{id}",
            get(review::get_review)
                .put(review::update_review)
                .delete(review::delete_review),
        )
        .route(
            "/user/{user_id}",
            get(review::list_user_reviews).delete(review::delete_user_reviews),
        )
        .route(
            "/place/{place_id}",
            get(review::list_place_reviews).delete(review::delete_place_reviews),
        )
}
