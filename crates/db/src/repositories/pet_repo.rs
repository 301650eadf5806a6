//! Repository for the `pets` collection.

use bson::oid::ObjectId;
use bson::{doc, Bson};

use crate::error::DbError;
use crate::models::pet::{Pet, PetDocument, PetRequest};
use crate::repositories::{decode, decode_each, encode};
use crate::store::{DocumentStore, Filter, ListOptions, SortOrder};

pub const PETS: &str = "pets";

pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Provides CRUD operations for pets.
pub struct PetRepo;

impl PetRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &PetRequest,
        owner_id: Option<ObjectId>,
    ) -> Result<Pet, DbError> {
        let now = bson::DateTime::now();
        let mut doc = PetDocument {
            id: None,
            name: input.name.clone(),
            gender: input.gender.clone(),
            size: input.size.clone(),
            breed: input.breed.clone(),
            avatar: input.avatar.clone(),
            character: input.character.clone(),
            age: input.age,
            owner_id,
            created_at: now,
            updated_at: now,
        };
        doc.id = Some(store.insert_one(PETS, encode(&doc)?).await?);
        Ok(doc.into())
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: ObjectId) -> Result<Option<Pet>, DbError> {
        store
            .find_one(PETS, &Filter::by_id(id))
            .await?
            .map(|doc| decode::<PetDocument>(doc).map(Pet::from))
            .transpose()
    }

    /// Newest pets first, optionally only those of one owner.
    pub async fn list(
        store: &dyn DocumentStore,
        owner_id: Option<ObjectId>,
        limit: i64,
    ) -> Result<Vec<Pet>, DbError> {
        let filter = Filter::all().eq_opt("ownerId", owner_id);
        let options = ListOptions::sorted("createdAt", SortOrder::Descending).limit(limit);
        let docs = store.find_many(PETS, &filter, &options).await?;
        Ok(decode_each::<PetDocument>(docs, "pet")
            .into_iter()
            .map(Pet::from)
            .collect())
    }

    /// Replace the profile fields. Returns `None` if no pet has this id.
    pub async fn update(
        store: &dyn DocumentStore,
        id: ObjectId,
        input: &PetRequest,
    ) -> Result<Option<Pet>, DbError> {
        let set = doc! {
            "name": input.name.as_str(),
            "gender": input.gender.as_str(),
            "size": input.size.as_str(),
            "breed": input.breed.as_str(),
            "avatar": input.avatar.as_str(),
            "character": input.character.as_str(),
            "age": input.age,
            "updatedAt": Bson::DateTime(bson::DateTime::now()),
        };
        if !store.update_one(PETS, &Filter::by_id(id), set).await? {
            return Ok(None);
        }
        Self::find_by_id(store, id).await
    }

    /// Delete a pet. Returns `true` if a document was removed.
    pub async fn delete(store: &dyn DocumentStore, id: ObjectId) -> Result<bool, DbError> {
        store.delete_one(PETS, &Filter::by_id(id)).await
    }
}
