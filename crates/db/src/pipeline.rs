//! Typed aggregation pipeline for location queries.
//!
//! Stages are kept as data so their order can be inspected and so every
//! store adapter evaluates the same plan. [`Pipeline::to_documents`] renders
//! the MongoDB form:
//!
//! ```text
//! Proximity     -> { $geoNear: { near, key, distanceField, maxDistance, spherical } }
//! PatternMatch  -> { $match: { $or: [ { <field>: { $regex, $options: "i" } }, .. ] } }
//! Equality      -> { $match: { <field>: <value> } }
//! Limit         -> { $limit: n }
//! ```

use bson::{doc, Bson, Document};
use playtime_core::geo::GeoPoint;

/// Location document fields a pipeline stage may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationField {
    Name,
    Description,
    Category,
    Point,
}

impl LocationField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
            Self::Category => "category",
            Self::Point => "location",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    /// Keep documents within `max_distance_m` of `center`, nearest first,
    /// writing the distance in meters to `distance_field`.
    Proximity {
        center: GeoPoint,
        key: LocationField,
        max_distance_m: f64,
        spherical: bool,
        distance_field: &'static str,
    },
    /// Keep documents where any of `fields` contains `pattern`
    /// (literal, case-insensitive).
    PatternMatch {
        fields: Vec<LocationField>,
        pattern: String,
    },
    /// Keep documents where `field` equals `value`.
    Equality { field: LocationField, value: String },
    /// Keep at most this many documents.
    Limit(i64),
}

impl Stage {
    pub fn to_document(&self) -> Document {
        match self {
            Stage::Proximity {
                center,
                key,
                max_distance_m,
                spherical,
                distance_field,
            } => doc! {
                "$geoNear": {
                    "near": {
                        "type": "Point",
                        "coordinates": center.coordinates.clone(),
                    },
                    "key": key.as_str(),
                    "distanceField": *distance_field,
                    "maxDistance": *max_distance_m,
                    "spherical": *spherical,
                }
            },
            Stage::PatternMatch { fields, pattern } => {
                let escaped = regex::escape(pattern);
                let alternatives: Vec<Bson> = fields
                    .iter()
                    .map(|field| {
                        Bson::Document(doc! {
                            field.as_str(): { "$regex": escaped.as_str(), "$options": "i" }
                        })
                    })
                    .collect();
                doc! { "$match": { "$or": alternatives } }
            }
            Stage::Equality { field, value } => doc! {
                "$match": { field.as_str(): value.as_str() }
            },
            Stage::Limit(n) => doc! { "$limit": *n },
        }
    }
}

/// An ordered list of stages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn to_documents(&self) -> Vec<Document> {
        self.stages.iter().map(Stage::to_document).collect()
    }
}
