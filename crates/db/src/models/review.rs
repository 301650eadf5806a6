//! Review documents and DTOs.

use bson::oid::ObjectId;
use playtime_core::error::CoreError;
use playtime_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::parse_object_id;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// A document in the `reviews` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub place_id: ObjectId,
    pub user_id: ObjectId,
    #[serde(default)]
    pub user_name: String,
    pub content: String,
    pub rating: i32,
    pub date: bson::DateTime,
}

impl From<ReviewDocument> for Review {
    fn from(doc: ReviewDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            place_id: doc.place_id.to_hex(),
            user_id: doc.user_id.to_hex(),
            user_name: doc.user_name,
            content: doc.content,
            rating: doc.rating,
            date: doc.date.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub place_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub rating: i32,
    pub date: Timestamp,
}

/// Body of `POST /reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReview {
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
}

impl CreateReview {
    /// Validate fields and parse `(place_id, user_id)`.
    pub fn check(&self) -> Result<(ObjectId, ObjectId), CoreError> {
        self.validate()?;
        let place_id = parse_object_id("place_id", &self.place_id)?;
        let user_id = parse_object_id("user_id", &self.user_id)?;
        Ok((place_id, user_id))
    }
}

/// Body of `PUT /reviews/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateReview {
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
}

impl UpdateReview {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        Ok(())
    }
}

/// Filters for listing reviews; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub place_id: Option<ObjectId>,
    pub user_id: Option<ObjectId>,
    pub rating: Option<i32>,
    pub limit: Option<i64>,
}

/// Check a rating query parameter.
pub fn validate_rating(rating: i32) -> Result<i32, CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )))
    }
}
