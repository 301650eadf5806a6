use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use playtime_db::models::review::{
    validate_rating, CreateReview, Review, ReviewFilter, UpdateReview,
};
use playtime_db::repositories::ReviewRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::{parse_id, parse_optional_id, ReviewListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a bulk delete.
#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: u64,
}

// ---------------------------------------------------------------------------
// Single reviews
// ---------------------------------------------------------------------------

/// POST /api/v1/reviews
pub async fn create_review(
    State(state): State<AppState>,
    Json(input): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    let (place_id, user_id) = input.check()?;
    let review = ReviewRepo::create(state.store.as_ref(), &input, place_id, user_id).await?;
    tracing::info!(review_id = %review.id, place_id = %place_id, "Review created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/reviews?placeId=&userId=&rating=&limit=
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let filter = ReviewFilter {
        place_id: parse_optional_id("placeId", params.place_id.as_deref())?,
        user_id: parse_optional_id("userId", params.user_id.as_deref())?,
        rating: params.rating.map(validate_rating).transpose()?,
        limit: params.limit,
    };
    let reviews = ReviewRepo::list(state.store.as_ref(), &filter).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// GET /api/v1/reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Review>>> {
    let review = ReviewRepo::find_by_id(state.store.as_ref(), parse_id("id", &id)?)
        .await?
        .ok_or_else(|| AppError::not_found("Review", &id))?;
    Ok(Json(DataResponse { data: review }))
}

/// PUT /api/v1/reviews/{id}
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdateReview>,
) -> AppResult<Json<DataResponse<Review>>> {
    let review_id = parse_id("id", &id)?;
    input.check()?;
    let review = ReviewRepo::update(state.store.as_ref(), review_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Review", &id))?;
    Ok(Json(DataResponse { data: review }))
}

/// DELETE /api/v1/reviews/{id}
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let review_id = parse_id("id", &id)?;
    if ReviewRepo::delete(state.store.as_ref(), review_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Review", &id))
    }
}

// ---------------------------------------------------------------------------
// By user / by place
// ---------------------------------------------------------------------------

/// GET /api/v1/reviews/user/{user_id}
pub async fn list_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let user_id = parse_id("userId", &user_id)?;
    let reviews = ReviewRepo::list_by_user(state.store.as_ref(), user_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// DELETE /api/v1/reviews/user/{user_id}
pub async fn delete_user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<DataResponse<DeletedCount>>> {
    let user_id = parse_id("userId", &user_id)?;
    let deleted = ReviewRepo::delete_by_user(state.store.as_ref(), user_id).await?;
    Ok(Json(DataResponse {
        data: DeletedCount { deleted },
    }))
}

/// GET /api/v1/reviews/place/{place_id}
pub async fn list_place_reviews(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let place_id = parse_id("placeId", &place_id)?;
    let reviews = ReviewRepo::list_by_place(state.store.as_ref(), place_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// DELETE /api/v1/reviews/place/{place_id}
pub async fn delete_place_reviews(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> AppResult<Json<DataResponse<DeletedCount>>> {
    let place_id = parse_id("placeId", &place_id)?;
    let deleted = ReviewRepo::delete_by_place(state.store.as_ref(), place_id).await?;
    Ok(Json(DataResponse {
        data: DeletedCount { deleted },
    }))
}
