//! Repository for the `reviews` collection.

use bson::oid::ObjectId;
use bson::{doc, Bson};

use crate::error::DbError;
use crate::models::review::{CreateReview, Review, ReviewDocument, ReviewFilter, UpdateReview};
use crate::repositories::{decode, decode_each, encode};
use crate::store::{DocumentStore, Filter, ListOptions, SortOrder};

pub const REVIEWS: &str = "reviews";

/// Provides CRUD and bulk operations for reviews. Lists are newest first.
pub struct ReviewRepo;

impl ReviewRepo {
    pub async fn create(
        store: &dyn DocumentStore,
        input: &CreateReview,
        place_id: ObjectId,
        user_id: ObjectId,
    ) -> Result<Review, DbError> {
        let mut doc = ReviewDocument {
            id: None,
            place_id,
            user_id,
            user_name: input.user_name.clone(),
            content: input.content.clone(),
            rating: input.rating,
            date: bson::DateTime::now(),
        };
        doc.id = Some(store.insert_one(REVIEWS, encode(&doc)?).await?);
        Ok(doc.into())
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        id: ObjectId,
    ) -> Result<Option<Review>, DbError> {
        store
            .find_one(REVIEWS, &Filter::by_id(id))
            .await?
            .map(|doc| decode::<ReviewDocument>(doc).map(Review::from))
            .transpose()
    }

    pub async fn list(
        store: &dyn DocumentStore,
        params: &ReviewFilter,
    ) -> Result<Vec<Review>, DbError> {
        let filter = Filter::all()
            .eq_opt("place_id", params.place_id)
            .eq_opt("user_id", params.user_id)
            .eq_opt("rating", params.rating);
        let mut options = ListOptions::sorted("date", SortOrder::Descending);
        if let Some(limit) = params.limit.filter(|n| *n > 0) {
            options = options.limit(limit);
        }
        Self::find(store, &filter, &options).await
    }

    pub async fn list_by_user(
        store: &dyn DocumentStore,
        user_id: ObjectId,
    ) -> Result<Vec<Review>, DbError> {
        let filter = Filter::all().eq("user_id", user_id);
        Self::find(store, &filter, &ListOptions::sorted("date", SortOrder::Descending)).await
    }

    pub async fn list_by_place(
        store: &dyn DocumentStore,
        place_id: ObjectId,
    ) -> Result<Vec<Review>, DbError> {
        let filter = Filter::all().eq("place_id", place_id);
        Self::find(store, &filter, &ListOptions::sorted("date", SortOrder::Descending)).await
    }

    /// Replace content and rating, refreshing the date. Returns `None` if no
    /// review has this id.
    pub async fn update(
        store: &dyn DocumentStore,
        id: ObjectId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, DbError> {
        let set = doc! {
            "content": input.content.as_str(),
            "rating": input.rating,
            "date": Bson::DateTime(bson::DateTime::now()),
        };
        if !store.update_one(REVIEWS, &Filter::by_id(id), set).await? {
            return Ok(None);
        }
        Self::find_by_id(store, id).await
    }

    pub async fn delete(store: &dyn DocumentStore, id: ObjectId) -> Result<bool, DbError> {
        store.delete_one(REVIEWS, &Filter::by_id(id)).await
    }

    /// Remove every review written by a user. Returns how many were removed.
    pub async fn delete_by_user(store: &dyn DocumentStore, user_id: ObjectId) -> Result<u64, DbError> {
        let deleted = store
            .delete_many(REVIEWS, &Filter::all().eq("user_id", user_id))
            .await?;
        tracing::info!(user_id = %user_id, deleted, "Deleted user reviews");
        Ok(deleted)
    }

    /// Remove every review of a place. Returns how many were removed.
    pub async fn delete_by_place(
        store: &dyn DocumentStore,
        place_id: ObjectId,
    ) -> Result<u64, DbError> {
        let deleted = store
            .delete_many(REVIEWS, &Filter::all().eq("place_id", place_id))
            .await?;
        tracing::info!(place_id = %place_id, deleted, "Deleted place reviews");
        Ok(deleted)
    }

    async fn find(
        store: &dyn DocumentStore,
        filter: &Filter,
        options: &ListOptions,
    ) -> Result<Vec<Review>, DbError> {
        let docs = store.find_many(REVIEWS, filter, options).await?;
        Ok(decode_each::<ReviewDocument>(docs, "review")
            .into_iter()
            .map(Review::from)
            .collect())
    }
}
