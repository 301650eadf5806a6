use std::time::Duration;

use playtime_core::geo::GeoError;

/// Failure of a document-store round trip or of mapping its documents.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Query failed: {0}")]
    Query(#[from] mongodb::error::Error),

    #[error("Store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("Failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("Insert did not return an object id")]
    MissingInsertedId,

    #[error(transparent)]
    MalformedPoint(#[from] GeoError),
}
