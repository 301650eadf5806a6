//! The document-store seam.
//!
//! Repositories and the geo search talk to a [`DocumentStore`] rather than to
//! the driver directly. The trait carries exactly the operations the service
//! issues; filters are conjunctions of equality clauses.

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};

use crate::error::DbError;
use crate::pipeline::Pipeline;

/// A conjunction of `field == value` clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Bson)>,
}

impl Filter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: ObjectId) -> Self {
        Self::all().eq("_id", id)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Add a clause only when `value` is present.
    pub fn eq_opt<V: Into<Bson>>(self, field: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn clauses(&self) -> &[(String, Bson)] {
        &self.clauses
    }

    pub fn to_document(&self) -> Document {
        self.clauses
            .iter()
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Sort and cap for [`DocumentStore::find_many`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    pub sort: Option<(&'static str, SortOrder)>,
    pub limit: Option<i64>,
}

impl ListOptions {
    pub fn sorted(field: &'static str, order: SortOrder) -> Self {
        Self {
            sort: Some((field, order)),
            limit: None,
        }
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A named `2dsphere` index on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SphericalIndex {
    pub field: &'static str,
    pub name: &'static str,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document, returning the id the store assigned.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId, DbError>;

    async fn find_one(&self, collection: &str, filter: &Filter)
        -> Result<Option<Document>, DbError>;

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: &ListOptions,
    ) -> Result<Vec<Document>, DbError>;

    /// Apply `$set` to the first match. Returns whether anything matched.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<bool, DbError>;

    /// Returns whether a document was removed.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, DbError>;

    /// Returns the number of removed documents.
    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, DbError>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DbError>;

    async fn aggregate(&self, collection: &str, pipeline: &Pipeline)
        -> Result<Vec<Document>, DbError>;

    /// Create the index unless an identical one exists.
    async fn ensure_index(&self, collection: &str, index: &SphericalIndex) -> Result<(), DbError>;

    async fn ping(&self) -> Result<(), DbError>;
}
