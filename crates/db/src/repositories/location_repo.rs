//! Repository for the `locations` collection.

use bson::oid::ObjectId;
use bson::Bson;

use crate::error::DbError;
use crate::models::location::{Location, LocationDocument, LocationRequest};
use crate::repositories::{decode, encode};
use crate::store::{DocumentStore, Filter, ListOptions, SortOrder};

pub const LOCATIONS: &str = "locations";

/// Default cap for [`LocationRepo::list`].
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a location built from a validated request.
    pub async fn create(
        store: &dyn DocumentStore,
        input: &LocationRequest,
    ) -> Result<Location, DbError> {
        let mut doc = LocationDocument::from_request(input);
        let id = store.insert_one(LOCATIONS, encode(&doc)?).await?;
        doc.id = Some(id);
        doc.into_location()
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: ObjectId,
    ) -> Result<Option<Location>, DbError> {
        match store.find_one(LOCATIONS, &Filter::by_id(id)).await? {
            Some(doc) => Ok(Some(decode::<LocationDocument>(doc)?.into_location()?)),
            None => Ok(None),
        }
    }

    /// List locations sorted by name, optionally by category.
    ///
    /// Stored records that fail to decode or convert are logged and left out.
    pub async fn list(
        store: &dyn DocumentStore,
        category: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<Location>, DbError> {
        let filter = Filter::all().eq_opt("category", category.filter(|c| !c.is_empty()));
        let options = ListOptions::sorted("name", SortOrder::Ascending)
            .limit(limit.filter(|n| *n > 0).unwrap_or(DEFAULT_LIST_LIMIT));

        let docs = store.find_many(LOCATIONS, &filter, &options).await?;
        Ok(docs
            .into_iter()
            .filter_map(|doc| {
                let id = doc.get_object_id("_id").ok();
                match decode::<LocationDocument>(doc).and_then(LocationDocument::into_location) {
                    Ok(location) => Some(location),
                    Err(e) => {
                        tracing::warn!(id = ?id, error = %e, "Skipping unreadable location");
                        None
                    }
                }
            })
            .collect())
    }

    /// Replace the mutable fields and the point. Returns `None` if no
    /// location has this id.
    pub async fn update(
        store: &dyn DocumentStore,
        id: ObjectId,
        input: &LocationRequest,
    ) -> Result<Option<Location>, DbError> {
        let fresh = LocationDocument::from_request(input);
        let mut set = encode(&fresh.details)?;
        set.insert("location", encode(&fresh.location)?);
        set.insert("updatedAt", Bson::DateTime(fresh.updated_at));

        if !store.update_one(LOCATIONS, &Filter::by_id(id), set).await? {
            return Ok(None);
        }
        Self::find_by_id(store, id).await
    }

    /// Delete a location. Returns `true` if a document was removed.
    pub async fn delete(store: &dyn DocumentStore, id: ObjectId) -> Result<bool, DbError> {
        let filter = Filter::by_id(id);
        if store.count(LOCATIONS, &filter).await? == 0 {
            return Ok(false);
        }
        store.delete_one(LOCATIONS, &filter).await
    }
}
