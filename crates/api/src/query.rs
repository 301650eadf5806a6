//! Query parameter types for API handlers, and path id parsing.

use playtime_db::ObjectId;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Parse a path or query id, rejecting anything that is not a 24-char hex
/// object id with 400.
pub fn parse_id(field: &str, value: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(value)
        .map_err(|_| AppError::BadRequest(format!("Invalid {field}: {value:?}")))
}

/// Like [`parse_id`] for optional filters; blank values mean "no filter".
pub fn parse_optional_id(field: &str, value: Option<&str>) -> AppResult<Option<ObjectId>> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| parse_id(field, v))
        .transpose()
}

/// `GET /users?id=&phone=`. With neither set the endpoint lists users.
#[derive(Debug, Default, Deserialize)]
pub struct UserLookupParams {
    pub id: Option<String>,
    pub phone: Option<String>,
}

/// `GET /pets?ownerId=`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetListParams {
    pub owner_id: Option<String>,
}

/// `GET /places?category=&limit=`.
#[derive(Debug, Default, Deserialize)]
pub struct PlaceListParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

/// `GET /places/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub keyword: Option<String>,
    /// Meters.
    pub radius: Option<f64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
}

/// `GET /reviews?placeId=&userId=&rating=&limit=`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    pub place_id: Option<String>,
    pub user_id: Option<String>,
    pub rating: Option<i32>,
    pub limit: Option<i64>,
}

/// `GET /wechat/login?code=`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    pub code: Option<String>,
}

/// `GET /wechat/map/reverse-geocode?lat=&lng=`.
#[derive(Debug, Default, Deserialize)]
pub struct ReverseGeocodeParams {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
