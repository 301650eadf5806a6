//! Pet documents and DTOs.

use bson::oid::ObjectId;
use playtime_core::error::CoreError;
use playtime_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::parse_object_id;

/// A document in the `pets` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub character: String,
    pub age: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<ObjectId>,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl From<PetDocument> for Pet {
    fn from(doc: PetDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: doc.name,
            gender: doc.gender,
            size: doc.size,
            breed: doc.breed,
            avatar: doc.avatar,
            character: doc.character,
            age: doc.age,
            owner_id: doc.owner_id.map(|id| id.to_hex()),
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub size: String,
    pub breed: String,
    pub avatar: String,
    pub character: String,
    pub age: i32,
    pub owner_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of pet create and update requests.
///
/// `ownerId` is only honoured on create; ownership does not move.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PetRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub character: String,
    #[validate(range(min = 1, message = "age must be greater than 0"))]
    pub age: i32,
    #[serde(default)]
    pub owner_id: Option<String>,
}

impl PetRequest {
    /// Validate fields and parse the owner id.
    pub fn check(&self) -> Result<Option<ObjectId>, CoreError> {
        self.validate()?;
        self.owner_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| parse_object_id("ownerId", id))
            .transpose()
    }
}
