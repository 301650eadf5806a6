//! GeoJSON point conversion and spherical distance helpers.
//!
//! Stored points follow GeoJSON coordinate order (`[longitude, latitude]`)
//! while everything user-facing speaks `(latitude, longitude)`. The two
//! functions [`to_point`] and [`from_point`] are the only places that swap
//! the order, and they are exact inverses of each other.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean earth radius used by MongoDB for spherical `$geoNear` queries.
pub const EARTH_RADIUS_METERS: f64 = 6_378_100.0;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// GeoJSON geometry type tag. Only points are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoJsonType {
    Point,
}

/// A GeoJSON point as persisted on a location document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type")]
    pub kind: GeoJsonType,
    /// `[longitude, latitude]`.
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("Malformed GeoJSON point: expected 2 coordinates, found {len}")]
    MalformedPoint { len: usize },
}

/// Build the storage representation of `(lat, lon)`.
///
/// No range validation happens here; callers validate with
/// [`validate_coordinates`] before persisting user input.
pub fn to_point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint {
        kind: GeoJsonType::Point,
        coordinates: vec![lon, lat],
    }
}

/// Extract `(lat, lon)` from a stored point.
///
/// Fails unless the point carries exactly two coordinates.
pub fn from_point(point: &GeoPoint) -> Result<(f64, f64), GeoError> {
    match point.coordinates.as_slice() {
        [lon, lat] => Ok((*lat, *lon)),
        other => Err(GeoError::MalformedPoint { len: other.len() }),
    }
}

/// Check that latitude is in `[-90, 90]` and longitude in `[-180, 180]`.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), CoreError> {
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(CoreError::Validation(format!(
            "latitude must be between {MIN_LATITUDE} and {MAX_LATITUDE}, got {lat}"
        )));
    }
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
        return Err(CoreError::Validation(format!(
            "longitude must be between {MIN_LONGITUDE} and {MAX_LONGITUDE}, got {lon}"
        )));
    }
    Ok(())
}

/// Great-circle distance in meters between two `(lat, lon)` pairs
/// (haversine on a sphere of [`EARTH_RADIUS_METERS`]).
pub fn spherical_distance_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_METERS * c
}
