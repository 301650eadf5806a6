use std::sync::Arc;

pub mod error;
pub mod geo_search;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod models;
pub mod mongo;
pub mod pipeline;
pub mod repositories;
pub mod store;

pub use bson::oid::ObjectId;
pub use error::DbError;
pub use store::DocumentStore;

/// Shared handle to the document store used by the application.
pub type DbHandle = Arc<dyn DocumentStore>;

/// Check that the store answers.
pub async fn health_check(store: &dyn DocumentStore) -> Result<(), DbError> {
    store.ping().await
}
