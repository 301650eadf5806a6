//! User documents and DTOs.

use bson::oid::ObjectId;
use playtime_core::error::CoreError;
use playtime_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A document in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub nick_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub avatar_url: String,
    pub open_id: String,
    #[serde(default)]
    pub union_id: String,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.map(|id| id.to_hex()).unwrap_or_default(),
            nick_name: doc.nick_name,
            phone_number: doc.phone_number,
            avatar_url: doc.avatar_url,
            open_id: doc.open_id,
            union_id: doc.union_id,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub nick_name: String,
    pub phone_number: String,
    pub avatar_url: String,
    pub open_id: String,
    pub union_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of `POST /users`, keyed by `openId`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUser {
    #[serde(default)]
    pub nick_name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "phoneNumber is required"))]
    pub phone_number: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "openId is required"))]
    pub open_id: String,
    #[serde(default)]
    pub union_id: String,
}

impl UpsertUser {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()?;
        Ok(())
    }
}
