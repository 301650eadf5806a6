//! Handlers for the `/places` resource and nearby search.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use playtime_core::geo::validate_coordinates;
use playtime_core::search::SearchQuery;
use playtime_db::geo_search::GeoSearch;
use playtime_db::models::location::{Location, LocationRequest, SearchResult};
use playtime_db::repositories::LocationRepo;

use crate::error::{AppError, AppResult};
use crate::query::{parse_id, PlaceListParams, SearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/places
pub async fn create_place(
    State(state): State<AppState>,
    Json(input): Json<LocationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Location>>)> {
    input.check()?;
    let place = LocationRepo::create(state.store.as_ref(), &input).await?;
    tracing::info!(place_id = %place.id, category = %place.details.category, "Place created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: place })))
}

/// GET /api/v1/places?category=&limit=
///
/// Sorted by name; at most 100 unless `limit` says otherwise.
pub async fn list_places(
    State(state): State<AppState>,
    Query(params): Query<PlaceListParams>,
) -> AppResult<Json<DataResponse<Vec<Location>>>> {
    let places =
        LocationRepo::list(state.store.as_ref(), params.category.as_deref(), params.limit).await?;
    Ok(Json(DataResponse { data: places }))
}

/// GET /api/v1/places/{id}
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<Location>>> {
    let place = LocationRepo::find_by_id(state.store.as_ref(), parse_id("id", &id)?)
        .await?
        .ok_or_else(|| AppError::not_found("Place", &id))?;
    Ok(Json(DataResponse { data: place }))
}

/// PUT /api/v1/places/{id}
///
/// Replaces every mutable field; the stored point is rebuilt from the new
/// coordinates.
pub async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<LocationRequest>,
) -> AppResult<Json<DataResponse<Location>>> {
    let place_id = parse_id("id", &id)?;
    input.check()?;
    let place = LocationRepo::update(state.store.as_ref(), place_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Place", &id))?;
    Ok(Json(DataResponse { data: place }))
}

/// DELETE /api/v1/places/{id}
pub async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let place_id = parse_id("id", &id)?;
    if LocationRepo::delete(state.store.as_ref(), place_id).await? {
        tracing::info!(place_id = %id, "Place deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Place", &id))
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// GET /api/v1/places/search?latitude=&longitude=&keyword=&radius=&limit=&category=
///
/// Places within `radius` meters (default 1000), nearest first, at most
/// `limit` (default 10).
pub async fn search_places(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<SearchResult>>>> {
    let query = search_query(&params)?;
    let results = GeoSearch::search_nearby(state.store.as_ref(), &query).await?;
    Ok(Json(DataResponse { data: results }))
}

fn search_query(params: &SearchParams) -> AppResult<SearchQuery> {
    let (Some(latitude), Some(longitude)) = (params.latitude, params.longitude) else {
        return Err(AppError::BadRequest(
            "latitude and longitude are required".into(),
        ));
    };
    validate_coordinates(latitude, longitude)?;

    let mut query = SearchQuery::around(latitude, longitude);
    if let Some(radius) = params.radius {
        if radius.is_nan() || radius <= 0.0 {
            return Err(AppError::BadRequest("radius must be greater than 0".into()));
        }
        query = query.with_radius(radius);
    }
    if let Some(limit) = params.limit {
        if limit <= 0 {
            return Err(AppError::BadRequest("limit must be greater than 0".into()));
        }
        query = query.with_limit(limit);
    }
    if let Some(keyword) = &params.keyword {
        query = query.with_keyword(keyword.as_str());
    }
    if let Some(category) = &params.category {
        query = query.with_category(category.as_str());
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn params(latitude: Option<f64>, longitude: Option<f64>) -> SearchParams {
        SearchParams {
            latitude,
            longitude,
            ..Default::default()
        }
    }

    #[test]
    fn coordinates_are_required() {
        assert_matches!(search_query(&params(None, Some(1.0))), Err(AppError::BadRequest(_)));
        assert_matches!(search_query(&params(Some(1.0), None)), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn out_of_range_latitude_is_rejected() {
        assert_matches!(
            search_query(&params(Some(91.0), Some(0.0))),
            Err(AppError::Core(_))
        );
    }

    #[test]
    fn non_positive_radius_and_limit_are_rejected() {
        let zero_radius = SearchParams {
            radius: Some(0.0),
            ..params(Some(31.2), Some(121.4))
        };
        assert_matches!(search_query(&zero_radius), Err(AppError::BadRequest(_)));

        let negative_limit = SearchParams {
            limit: Some(-1),
            ..params(Some(31.2), Some(121.4))
        };
        assert_matches!(search_query(&negative_limit), Err(AppError::BadRequest(_)));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let query = search_query(&params(Some(31.2), Some(121.4))).unwrap();
        assert_eq!(query.effective_radius(), 1000.0);
        assert_eq!(query.effective_limit(), 10);
        assert_eq!(query.keyword(), None);
    }
}
