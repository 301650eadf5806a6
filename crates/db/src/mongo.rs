//! MongoDB adapter for [`DocumentStore`].

use std::future::IntoFuture;
use std::time::Duration;

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, Credential, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::error::DbError;
use crate::pipeline::Pipeline;
use crate::store::{DocumentStore, Filter, ListOptions, SortOrder, SphericalIndex};

/// Connection settings for [`MongoStore::connect`].
#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub user: Option<String>,
    pub pass: Option<String>,
    /// Bound on every store round trip.
    pub timeout: Duration,
}

/// A [`DocumentStore`] backed by one MongoDB database.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    timeout: Duration,
}

impl MongoStore {
    /// Connect, authenticate when credentials are configured, and ping.
    pub async fn connect(config: &MongoConfig) -> Result<Self, DbError> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        if let (Some(user), Some(pass)) = (&config.user, &config.pass) {
            options.credential = Some(
                Credential::builder()
                    .username(user.clone())
                    .password(pass.clone())
                    .build(),
            );
        }
        options.connect_timeout = Some(config.timeout);
        options.server_selection_timeout = Some(config.timeout);

        let client = Client::with_options(options)?;
        let store = Self {
            db: client.database(&config.database),
            timeout: config.timeout,
        };
        store.ping().await?;

        tracing::info!(database = %config.database, "Connected to MongoDB");
        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    /// Run one driver call under the configured timeout.
    async fn timed<T, F>(&self, fut: F) -> Result<T, DbError>
    where
        F: IntoFuture<Output = mongodb::error::Result<T>>,
    {
        tokio::time::timeout(self.timeout, fut.into_future())
            .await
            .map_err(|_| DbError::Timeout(self.timeout))?
            .map_err(DbError::from)
    }
}

fn sort_document(options: &ListOptions) -> Option<Document> {
    options.sort.map(|(field, order)| {
        let direction = match order {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        };
        doc! { field: direction }
    })
}

async fn collect_cursor(
    coll: Collection<Document>,
    filter: Document,
    options: &ListOptions,
) -> mongodb::error::Result<Vec<Document>> {
    let mut find = coll.find(filter);
    if let Some(sort) = sort_document(options) {
        find = find.sort(sort);
    }
    if let Some(limit) = options.limit {
        find = find.limit(limit);
    }
    find.await?.try_collect().await
}

async fn collect_aggregate(
    coll: Collection<Document>,
    stages: Vec<Document>,
) -> mongodb::error::Result<Vec<Document>> {
    coll.aggregate(stages).await?.try_collect().await
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<ObjectId, DbError> {
        let result = self.timed(self.collection(collection).insert_one(doc)).await?;
        result
            .inserted_id
            .as_object_id()
            .ok_or(DbError::MissingInsertedId)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, DbError> {
        self.timed(self.collection(collection).find_one(filter.to_document()))
            .await
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: &ListOptions,
    ) -> Result<Vec<Document>, DbError> {
        self.timed(collect_cursor(
            self.collection(collection),
            filter.to_document(),
            options,
        ))
        .await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<bool, DbError> {
        let result = self
            .timed(
                self.collection(collection)
                    .update_one(filter.to_document(), doc! { "$set": set }),
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, DbError> {
        let result = self
            .timed(self.collection(collection).delete_one(filter.to_document()))
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, DbError> {
        let result = self
            .timed(self.collection(collection).delete_many(filter.to_document()))
            .await?;
        Ok(result.deleted_count)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DbError> {
        self.timed(self.collection(collection).count_documents(filter.to_document()))
            .await
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, DbError> {
        self.timed(collect_aggregate(
            self.collection(collection),
            pipeline.to_documents(),
        ))
        .await
    }

    async fn ensure_index(&self, collection: &str, index: &SphericalIndex) -> Result<(), DbError> {
        let model = IndexModel::builder()
            .keys(doc! { index.field: "2dsphere" })
            .options(IndexOptions::builder().name(index.name.to_string()).build())
            .build();
        self.timed(self.collection(collection).create_index(model))
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), DbError> {
        self.timed(self.db.run_command(doc! { "ping": 1 })).await?;
        Ok(())
    }
}
