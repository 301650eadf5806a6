use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use playtime_db::models::pet::{Pet, PetRequest};
use playtime_db::repositories::pet_repo::DEFAULT_LIST_LIMIT;
use playtime_db::repositories::PetRepo;

use crate::error::{AppError, AppResult};
use crate::query::{parse_id, parse_optional_id, PetListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/pets
pub async fn create_pet(
    State(state): State<AppState>,
    Json(input): Json<PetRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Pet>>)> {
    let owner_id = input.check()?;
    let pet = PetRepo::create(state.store.as_ref(), &input, owner_id).await?;
    tracing::info!(pet_id = %pet.id, "Pet created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: pet })))
}

/// GET /api/v1/pets?ownerId=
pub async fn list_pets(
    State(state): State<AppState>,
    Query(params): Query<PetListParams>,
) -> AppResult<Json<DataResponse<Vec<Pet>>>> {
    let owner_id = parse_optional_id("ownerId", params.owner_id.as_deref())?;
    let pets = PetRepo::list(state.store.as_ref(), owner_id, DEFAULT_LIST_LIMIT).await?;
    Ok(Json(DataResponse { data: pets }))
}

/// GET /api/v1/pets/{id}
pub async fn get_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Pet>>> {
    let pet = PetRepo::find_by_id(state.store.as_ref(), parse_id("id", &id)?)
        .await?
        .ok_or_else(|| AppError::not_found("Pet", &id))?;
    Ok(Json(DataResponse { data: pet }))
}

/// PUT /api/v1/pets/{id}
///
/// `ownerId` in the body is ignored.
pub async fn update_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PetRequest>,
) -> AppResult<Json<DataResponse<Pet>>> {
    let pet_id = parse_id("id", &id)?;
    input.check()?;
    let pet = PetRepo::update(state.store.as_ref(), pet_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Pet", &id))?;
    Ok(Json(DataResponse { data: pet }))
}

/// DELETE /api/v1/pets/{id}
pub async fn delete_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let pet_id = parse_id("id", &id)?;
    if PetRepo::delete(state.store.as_ref(), pet_id).await? {
        tracing::info!(pet_id = %id, "Pet deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Pet", &id))
    }
}
