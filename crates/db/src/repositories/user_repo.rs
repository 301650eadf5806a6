//! Repository for the `users` collection.

use bson::oid::ObjectId;
use bson::{doc, Bson};

use crate::error::DbError;
use crate::models::user::{UpsertUser, User, UserDocument};
use crate::repositories::{decode, decode_each, encode};
use crate::store::{DocumentStore, Filter, ListOptions, SortOrder};

pub const USERS: &str = "users";

pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Outcome of [`UserRepo::upsert_by_open_id`].
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted {
    Created(User),
    Updated(User),
}

/// Provides lookups and the openId upsert for users.
pub struct UserRepo;

impl UserRepo {
    /// Create the user for `input.open_id`, or refresh its profile fields.
    pub async fn upsert_by_open_id(
        store: &dyn DocumentStore,
        input: &UpsertUser,
    ) -> Result<Upserted, DbError> {
        let by_open_id = Filter::all().eq("openId", input.open_id.as_str());
        let now = bson::DateTime::now();

        if let Some(existing) = store.find_one(USERS, &by_open_id).await? {
            let existing: UserDocument = decode(existing)?;
            let set = doc! {
                "nickName": input.nick_name.as_str(),
                "phoneNumber": input.phone_number.as_str(),
                "avatarUrl": input.avatar_url.as_str(),
                "unionId": input.union_id.as_str(),
                "updatedAt": Bson::DateTime(now),
            };
            store.update_one(USERS, &by_open_id, set).await?;
            return Ok(Upserted::Updated(User::from(UserDocument {
                nick_name: input.nick_name.clone(),
                phone_number: input.phone_number.clone(),
                avatar_url: input.avatar_url.clone(),
                union_id: input.union_id.clone(),
                updated_at: now,
                ..existing
            })));
        }

        let mut doc = UserDocument {
            id: None,
            nick_name: input.nick_name.clone(),
            phone_number: input.phone_number.clone(),
            avatar_url: input.avatar_url.clone(),
            open_id: input.open_id.clone(),
            union_id: input.union_id.clone(),
            created_at: now,
            updated_at: now,
        };
        doc.id = Some(store.insert_one(USERS, encode(&doc)?).await?);
        Ok(Upserted::Created(doc.into()))
    }

    pub async fn find_by_id(store: &dyn DocumentStore, id: ObjectId) -> Result<Option<User>, DbError> {
        Self::find_one(store, &Filter::by_id(id)).await
    }

    pub async fn find_by_phone(
        store: &dyn DocumentStore,
        phone: &str,
    ) -> Result<Option<User>, DbError> {
        Self::find_one(store, &Filter::all().eq("phoneNumber", phone)).await
    }

    pub async fn find_by_open_id(
        store: &dyn DocumentStore,
        open_id: &str,
    ) -> Result<Option<User>, DbError> {
        Self::find_one(store, &Filter::all().eq("openId", open_id)).await
    }

    /// Newest users first.
    pub async fn list(store: &dyn DocumentStore, limit: i64) -> Result<Vec<User>, DbError> {
        let options = ListOptions::sorted("createdAt", SortOrder::Descending).limit(limit);
        let docs = store.find_many(USERS, &Filter::all(), &options).await?;
        Ok(decode_each::<UserDocument>(docs, "user")
            .into_iter()
            .map(User::from)
            .collect())
    }

    async fn find_one(store: &dyn DocumentStore, filter: &Filter) -> Result<Option<User>, DbError> {
        store
            .find_one(USERS, filter)
            .await?
            .map(|doc| decode::<UserDocument>(doc).map(User::from))
            .transpose()
    }
}
