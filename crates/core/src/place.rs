//! Place (location) attributes shared by storage and the HTTP layer.
//!
//! The geographic point and the timestamps are owned by the persistence
//! layer; everything here is plain data that callers submit and read back.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Kind of place. Serialized lowercase (`"park"`, `"cafe"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Park,
    Cafe,
    Restaurant,
    Shop,
    Other,
}

impl PlaceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Park => "park",
            Self::Cafe => "cafe",
            Self::Restaurant => "restaurant",
            Self::Shop => "shop",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for PlaceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pet sizes a place welcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

/// Pet kinds a place welcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetType {
    Dog,
    Cat,
    Other,
}

/// Structured address as returned by the reverse geocoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponent {
    pub nation: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub street: String,
    pub street_number: String,
}

/// Administrative division codes as returned by the reverse geocoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdInfo {
    pub adcode: String,
    pub city_code: String,
    pub district_code: String,
    pub nation_code: String,
    pub nationality_code: String,
}

/// Mutable attributes of a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetails {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(length(min = 5, max = 200))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    pub category: PlaceCategory,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(max = 10))]
    pub photos: Vec<String>,
    #[serde(default)]
    pub is_pet_friendly: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pet_size: Vec<PetSize>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pet_type: Vec<PetType>,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1))]
    pub zone: Vec<String>,
    #[serde(default)]
    pub address_component: AddressComponent,
    #[serde(default)]
    pub ad_info: AdInfo,
}

/// Older records store unset lists as `null`; read those as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PlaceDetails {
    /// Run the declarative field rules plus the checks they cannot express.
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        if self.zone.iter().any(|z| z.trim().is_empty()) {
            return Err(CoreError::Validation("zone entries must not be empty".into()));
        }
        Ok(())
    }
}
