//! Nearby place search over the `locations` collection.
//!
//! A search is a fixed stage sequence:
//!
//! ```text
//! Proximity (centre, radius, spherical, -> "distance")
//!   -> PatternMatch (name | description, only with a keyword)
//!   -> Equality (category, only with a category)
//!   -> Limit
//! ```
//!
//! The result rows decode straight into [`NearbyDocument`] and are converted
//! to [`SearchResult`]s. Rows that cannot be decoded or whose stored point is
//! malformed are logged and skipped; they never fail the whole search.

use playtime_core::geo::to_point;
use playtime_core::search::SearchQuery;

use crate::error::DbError;
use crate::models::location::{NearbyDocument, SearchResult};
use crate::pipeline::{LocationField, Pipeline, Stage};
use crate::repositories::decode;
use crate::repositories::location_repo::LOCATIONS;
use crate::store::{DocumentStore, SphericalIndex};

/// Output field for the computed distance in meters.
pub const DISTANCE_FIELD: &str = "distance";

/// The spherical index the proximity stage relies on.
pub const LOCATION_INDEX: SphericalIndex = SphericalIndex {
    field: "location",
    name: "location_2dsphere",
};

/// Stateless entry point for nearby search.
pub struct GeoSearch;

impl GeoSearch {
    /// Build the stage sequence for `query`, substituting default radius
    /// and limit.
    pub fn build_pipeline(query: &SearchQuery) -> Pipeline {
        let mut pipeline = Pipeline::new().push(Stage::Proximity {
            center: to_point(query.latitude, query.longitude),
            key: LocationField::Point,
            max_distance_m: query.effective_radius(),
            spherical: true,
            distance_field: DISTANCE_FIELD,
        });

        if let Some(keyword) = query.keyword() {
            pipeline = pipeline.push(Stage::PatternMatch {
                fields: vec![LocationField::Name, LocationField::Description],
                pattern: keyword.to_string(),
            });
        }

        if let Some(category) = query.category() {
            pipeline = pipeline.push(Stage::Equality {
                field: LocationField::Category,
                value: category.to_string(),
            });
        }

        pipeline.push(Stage::Limit(query.effective_limit()))
    }

    /// Places near the query centre, nearest first.
    pub async fn search_nearby(
        store: &dyn DocumentStore,
        query: &SearchQuery,
    ) -> Result<Vec<SearchResult>, DbError> {
        let pipeline = Self::build_pipeline(query);
        let docs = store.aggregate(LOCATIONS, &pipeline).await?;

        let mut results = Vec::with_capacity(docs.len());
        for doc in docs {
            let id = doc.get_object_id("_id").ok();
            let converted = decode::<NearbyDocument>(doc).and_then(SearchResult::try_from);
            match converted {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(id = ?id, error = %e, "Skipping malformed search result");
                }
            }
        }

        tracing::debug!(
            lat = query.latitude,
            lon = query.longitude,
            radius_m = query.effective_radius(),
            found = results.len(),
            "Nearby search",
        );
        Ok(results)
    }

    /// Create the `location_2dsphere` index if it does not already exist.
    pub async fn ensure_geo_index(store: &dyn DocumentStore) -> Result<(), DbError> {
        store.ensure_index(LOCATIONS, &LOCATION_INDEX).await
    }
}
