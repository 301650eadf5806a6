pub mod location_repo;
pub mod pet_repo;
pub mod review_repo;
pub mod user_repo;

pub use location_repo::LocationRepo;
pub use pet_repo::PetRepo;
pub use review_repo::ReviewRepo;
pub use user_repo::UserRepo;

use bson::Document;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DbError;

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Document, DbError> {
    Ok(bson::to_document(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, DbError> {
    Ok(bson::from_document(doc)?)
}

/// Decode every document, logging and leaving out the ones that do not fit `T`.
pub(crate) fn decode_each<T: DeserializeOwned>(docs: Vec<Document>, entity: &str) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.get_object_id("_id").ok();
            match decode(doc) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(id = ?id, entity, error = %e, "Skipping unreadable record");
                    None
                }
            }
        })
        .collect()
}
