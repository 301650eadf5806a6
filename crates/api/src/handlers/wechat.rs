//! Handlers for the WeChat mini-program integration: login, phone lookup,
//! map key, reverse geocoding and image upload.

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use playtime_cloud::geocoder::ReverseGeocodeResult;
use playtime_cloud::storage::{is_allowed_image_type, upload_image as store_image, MAX_UPLOAD_BYTES};
use playtime_cloud::{CloudError, StoredObject};
use playtime_core::geo::validate_coordinates;
use playtime_wechat::{LoginSession, PhoneInfo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::query::{LoginParams, ReverseGeocodeParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Body of `POST /wechat/phone`.
#[derive(Debug, Deserialize)]
pub struct PhoneRequest {
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct MapKey {
    pub key: String,
}

/// GET /api/v1/wechat/login?code=
pub async fn login(
    State(state): State<AppState>,
    Query(params): Query<LoginParams>,
) -> AppResult<Json<DataResponse<LoginSession>>> {
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("code is required".into()))?;
    let session = state.wechat.code_to_session(&code).await?;
    tracing::info!(openid = %session.openid, "Login code exchanged");
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/wechat/phone
///
/// If WeChat rejects the cached access token, the token is dropped and the
/// lookup is retried once with a fresh one.
pub async fn phone_number(
    State(state): State<AppState>,
    Json(input): Json<PhoneRequest>,
) -> AppResult<Json<DataResponse<PhoneInfo>>> {
    if input.code.is_empty() {
        return Err(AppError::BadRequest("code is required".into()));
    }

    let token = state.tokens.get_token().await?;
    let info = match state.wechat.phone_number(&token.access_token, &input.code).await {
        Err(e) if e.is_token_rejected() => {
            tracing::warn!(error = %e, "Access token rejected, refreshing");
            state.tokens.invalidate().await;
            let token = state.tokens.get_token().await?;
            state
                .wechat
                .phone_number(&token.access_token, &input.code)
                .await?
        }
        other => other?,
    };
    Ok(Json(DataResponse { data: info }))
}

/// GET /api/v1/wechat/map-key
pub async fn map_key(State(state): State<AppState>) -> AppResult<Json<DataResponse<MapKey>>> {
    let key = state
        .geocoder
        .api_key()
        .ok_or(CloudError::NotConfigured("Map API key"))?;
    Ok(Json(DataResponse {
        data: MapKey { key: key.to_string() },
    }))
}

/// GET /api/v1/wechat/map/reverse-geocode?lat=&lng=
pub async fn reverse_geocode(
    State(state): State<AppState>,
    Query(params): Query<ReverseGeocodeParams>,
) -> AppResult<Json<DataResponse<ReverseGeocodeResult>>> {
    let (Some(lat), Some(lng)) = (params.lat, params.lng) else {
        return Err(AppError::BadRequest("lat and lng are required".into()));
    };
    validate_coordinates(lat, lng)?;
    let result = state.geocoder.reverse_geocode(lat, lng).await?;
    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/wechat/upload
///
/// Accepts a multipart body whose `file` field is a jpeg, png, gif or webp
/// image of at most 10 MiB, and stores it under `avatar/`.
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<StoredObject>>)> {
    let storage = state
        .storage
        .clone()
        .ok_or(CloudError::NotConfigured("Object storage"))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_allowed_image_type(&content_type) {
            return Err(AppError::BadRequest(format!(
                "Unsupported file type: {content_type:?}"
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".into()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::BadRequest(format!(
                "File exceeds {MAX_UPLOAD_BYTES} bytes"
            )));
        }

        let stored = store_image(storage.as_ref(), &filename, &content_type, data.to_vec()).await?;
        return Ok((StatusCode::CREATED, Json(DataResponse { data: stored })));
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field {FILE_FIELD:?}"
    )))
}
