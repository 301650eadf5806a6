//! Handlers for the `/users` resource.
//!
//! Users are keyed by their WeChat `openId`; `POST /users` creates the user
//! on first sight and refreshes the profile afterwards.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use playtime_db::models::user::{UpsertUser, User};
use playtime_db::repositories::user_repo::{Upserted, DEFAULT_LIST_LIMIT};
use playtime_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::query::{parse_id, UserLookupParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/users
///
/// Returns 201 when the user was created, 200 when an existing user with the
/// same `openId` was updated.
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(input): Json<UpsertUser>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    input.check()?;

    let (status, user) = match UserRepo::upsert_by_open_id(state.store.as_ref(), &input).await? {
        Upserted::Created(user) => {
            tracing::info!(user_id = %user.id, "User created");
            (StatusCode::CREATED, user)
        }
        Upserted::Updated(user) => (StatusCode::OK, user),
    };
    Ok((status, Json(DataResponse { data: user })))
}

/// GET /api/v1/users?id= | ?phone=
///
/// A single user when `id` or `phone` is given (id wins), otherwise the
/// newest users.
pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<UserLookupParams>,
) -> AppResult<Response> {
    let store = state.store.as_ref();

    if let Some(id) = params.id.as_deref().filter(|v| !v.is_empty()) {
        let user = UserRepo::find_by_id(store, parse_id("id", id)?)
            .await?
            .ok_or_else(|| AppError::not_found("User", id))?;
        return Ok(Json(DataResponse { data: user }).into_response());
    }

    if let Some(phone) = params.phone.as_deref().filter(|v| !v.is_empty()) {
        let user = UserRepo::find_by_phone(store, phone)
            .await?
            .ok_or_else(|| AppError::not_found("User", phone))?;
        return Ok(Json(DataResponse { data: user }).into_response());
    }

    let users = UserRepo::list(store, DEFAULT_LIST_LIMIT).await?;
    Ok(Json(DataResponse { data: users }).into_response())
}

/// GET /api/v1/users/openid/{open_id}
pub async fn get_user_by_open_id(
    State(state): State<AppState>,
    Path(open_id): Path<String>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_open_id(state.store.as_ref(), &open_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", &open_id))?;
    Ok(Json(DataResponse { data: user }))
}
