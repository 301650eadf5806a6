//! Nearby search parameters and their default substitution.

use serde::{Deserialize, Serialize};

/// Radius used when the caller passes a non-positive one.
pub const DEFAULT_SEARCH_RADIUS_METERS: f64 = 1000.0;

/// Result cap used when the caller passes a non-positive one.
pub const DEFAULT_SEARCH_LIMIT: i64 = 10;

/// A nearby search as issued by a caller.
///
/// Latitude and longitude are expected to be range-checked already;
/// radius and limit are taken as given and substituted at search time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub radius_m: f64,
    pub limit: i64,
}

impl SearchQuery {
    /// A query around `(lat, lon)` with no filters and default bounds.
    pub fn around(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            keyword: None,
            category: None,
            radius_m: 0.0,
            limit: 0,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Radius in meters, falling back to [`DEFAULT_SEARCH_RADIUS_METERS`]
    /// unless strictly positive (NaN also falls back).
    pub fn effective_radius(&self) -> f64 {
        if self.radius_m > 0.0 {
            self.radius_m
        } else {
            DEFAULT_SEARCH_RADIUS_METERS
        }
    }

    /// Result cap, falling back to [`DEFAULT_SEARCH_LIMIT`] unless positive.
    pub fn effective_limit(&self) -> i64 {
        if self.limit > 0 {
            self.limit
        } else {
            DEFAULT_SEARCH_LIMIT
        }
    }

    /// The keyword filter, or `None` when absent or empty.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().filter(|k| !k.is_empty())
    }

    /// The category filter, or `None` when absent or empty.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}
