//! Location (place) documents and DTOs.

use bson::oid::ObjectId;
use playtime_core::error::CoreError;
use playtime_core::geo::{from_point, to_point, validate_coordinates, GeoPoint};
use playtime_core::place::PlaceDetails;
use playtime_core::types::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// A document in the `locations` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub details: PlaceDetails,
    pub location: GeoPoint,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: bson::DateTime,
}

impl LocationDocument {
    /// A new document for `request`, stamped now and without an id.
    pub fn from_request(request: &LocationRequest) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: None,
            details: request.details.clone(),
            location: to_point(request.latitude, request.longitude),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn into_location(self) -> Result<Location, DbError> {
        let (latitude, longitude) = from_point(&self.location)?;
        Ok(Location {
            id: self.id.map(|id| id.to_hex()).unwrap_or_default(),
            details: self.details,
            latitude,
            longitude,
            created_at: self.created_at.to_chrono(),
            updated_at: self.updated_at.to_chrono(),
        })
    }
}

/// A location as served to clients: the point is flattened to
/// `latitude` / `longitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    #[serde(flatten)]
    pub details: PlaceDetails,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of create and update requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    #[serde(flatten)]
    pub details: PlaceDetails,
    pub latitude: f64,
    pub longitude: f64,
}

impl LocationRequest {
    pub fn check(&self) -> Result<(), CoreError> {
        self.details.check()?;
        validate_coordinates(self.latitude, self.longitude)
    }
}

/// One `$geoNear` output document: the stored entity plus the computed
/// distance, decoded in a single pass.
/// Ids and dates must not sit behind a nested flatten.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbyDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub details: PlaceDetails,
    pub location: GeoPoint,
    #[serde(rename = "createdAt")]
    pub created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    pub updated_at: bson::DateTime,
    pub distance: f64,
}

/// A nearby search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub location: Location,
    /// Meters from the search centre.
    pub distance: f64,
}

impl TryFrom<NearbyDocument> for SearchResult {
    type Error = DbError;

    fn try_from(nearby: NearbyDocument) -> Result<Self, Self::Error> {
        let document = LocationDocument {
            id: Some(nearby.id),
            details: nearby.details,
            location: nearby.location,
            created_at: nearby.created_at,
            updated_at: nearby.updated_at,
        };
        Ok(Self {
            location: document.into_location()?,
            distance: nearby.distance,
        })
    }
}
