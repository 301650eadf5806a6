//! In-memory [`DocumentStore`] for tests.
//!
//! Evaluates filters and pipeline stages the way MongoDB does for the
//! subset the service uses, including spherical distance for `$geoNear`.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use playtime_core::geo::spherical_distance_m;

use crate::error::DbError;
use crate::pipeline::{Pipeline, Stage};
use crate::store::{DocumentStore, Filter, ListOptions, SortOrder, SphericalIndex};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    indexes: Mutex<HashSet<(String, String)>>,
    unreachable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `ping` fail the way an unreachable server times out.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, AtomicOrdering::SeqCst);
    }

    /// Insert a raw document as-is (no `_id` is added if missing).
    pub fn seed(&self, collection: &str, doc: Document) {
        self.lock()
            .entry(collection.to_string())
            .or_default()
            .push(doc);
    }

    pub fn has_index(&self, collection: &str, name: &str) -> bool {
        self.indexes
            .lock()
            .map(|set| set.contains(&(collection.to_string(), name.to_string())))
            .unwrap_or(false)
    }

    pub fn index_count(&self) -> usize {
        self.indexes.lock().map(|set| set.len()).unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Document>>> {
        // A poisoned lock only means another test thread panicked.
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn matches(filter: &Filter, doc: &Document) -> bool {
    filter
        .clauses()
        .iter()
        .all(|(field, value)| doc.get(field).is_some_and(|v| bson_eq(v, value)))
}

/// Equality with numeric widening, as the server compares numbers by value.
fn bson_eq(a: &Bson, b: &Bson) -> bool {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn as_f64(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

fn compare(a: Option<&Bson>, b: Option<&Bson>) -> Ordering {
    match (a, b) {
        (Some(Bson::String(x)), Some(Bson::String(y))) => x.cmp(y),
        (Some(Bson::DateTime(x)), Some(Bson::DateTime(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_f64(x), as_f64(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `(lat, lon)` of a stored GeoJSON point, reading the first two
/// coordinates like the server's index does.
fn stored_point(doc: &Document, field: &str) -> Option<(f64, f64)> {
    let coordinates = doc.get_document(field).ok()?.get_array("coordinates").ok()?;
    let lon = as_f64(coordinates.first()?)?;
    let lat = as_f64(coordinates.get(1)?)?;
    Some((lat, lon))
}

fn apply_stage(stage: &Stage, docs: Vec<Document>) -> Vec<Document> {
    match stage {
        Stage::Proximity {
            center,
            key,
            max_distance_m,
            distance_field,
            ..
        } => {
            let (Some(&lon), Some(&lat)) = (center.coordinates.first(), center.coordinates.get(1))
            else {
                return Vec::new();
            };
            let mut within: Vec<(f64, Document)> = docs
                .into_iter()
                .filter_map(|doc| {
                    let (doc_lat, doc_lon) = stored_point(&doc, key.as_str())?;
                    let distance = spherical_distance_m(lat, lon, doc_lat, doc_lon);
                    (distance <= *max_distance_m).then_some((distance, doc))
                })
                .collect();
            within.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
            within
                .into_iter()
                .map(|(distance, mut doc)| {
                    doc.insert(*distance_field, distance);
                    doc
                })
                .collect()
        }
        Stage::PatternMatch { fields, pattern } => {
            let needle = pattern.to_lowercase();
            docs.into_iter()
                .filter(|doc| {
                    fields.iter().any(|field| {
                        doc.get_str(field.as_str())
                            .is_ok_and(|text| text.to_lowercase().contains(&needle))
                    })
                })
                .collect()
        }
        Stage::Equality { field, value } => docs
            .into_iter()
            .filter(|doc| doc.get_str(field.as_str()).is_ok_and(|v| v == value))
            .collect(),
        Stage::Limit(n) => docs
            .into_iter()
            .take(usize::try_from(*n).unwrap_or(0))
            .collect(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, mut doc: Document) -> Result<ObjectId, DbError> {
        let id = match doc.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            _ => {
                let id = ObjectId::new();
                doc.insert("_id", id);
                id
            }
        };
        self.seed(collection, doc);
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Document>, DbError> {
        Ok(self
            .lock()
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| matches(filter, doc)).cloned()))
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &Filter,
        options: &ListOptions,
    ) -> Result<Vec<Document>, DbError> {
        let mut found: Vec<Document> = self
            .lock()
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches(filter, doc)).cloned().collect())
            .unwrap_or_default();

        if let Some((field, order)) = options.sort {
            found.sort_by(|a, b| {
                let ord = compare(a.get(field), b.get(field));
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = options.limit.filter(|n| *n > 0) {
            found.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(found)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<bool, DbError> {
        let mut collections = self.lock();
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| matches(filter, doc)))
        else {
            return Ok(false);
        };
        for (field, value) in set {
            doc.insert(field, value);
        }
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<bool, DbError> {
        let mut collections = self.lock();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match docs.iter().position(|doc| matches(filter, doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> Result<u64, DbError> {
        let mut collections = self.lock();
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = docs.len();
        docs.retain(|doc| !matches(filter, doc));
        Ok((before - docs.len()) as u64)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, DbError> {
        Ok(self
            .lock()
            .get(collection)
            .map(|docs| docs.iter().filter(|doc| matches(filter, doc)).count() as u64)
            .unwrap_or(0))
    }

    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, DbError> {
        let docs = self.lock().get(collection).cloned().unwrap_or_default();
        Ok(pipeline
            .stages()
            .iter()
            .fold(docs, |docs, stage| apply_stage(stage, docs)))
    }

    async fn ensure_index(&self, collection: &str, index: &SphericalIndex) -> Result<(), DbError> {
        self.indexes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert((collection.to_string(), index.name.to_string()));
        Ok(())
    }

    async fn ping(&self) -> Result<(), DbError> {
        if self.unreachable.load(AtomicOrdering::SeqCst) {
            return Err(DbError::Timeout(Duration::ZERO));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use playtime_core::geo::to_point;

    use super::*;
    use crate::pipeline::LocationField;

    fn point_doc(name: &str, lat: f64, lon: f64) -> Document {
        doc! {
            "name": name,
            "location": { "type": "Point", "coordinates": [lon, lat] },
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_find_returns_it() {
        let store = MemoryStore::new();
        let id = store
            .insert_one("things", doc! { "name": "a" })
            .await
            .unwrap();
        let found = store
            .find_one("things", &Filter::by_id(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get_str("name").unwrap(), "a");
    }

    #[tokio::test]
    async fn find_many_sorts_and_limits() {
        let store = MemoryStore::new();
        for name in ["c", "a", "b"] {
            store.insert_one("things", doc! { "name": name }).await.unwrap();
        }
        let found = store
            .find_many(
                "things",
                &Filter::all(),
                &ListOptions::sorted("name", SortOrder::Ascending).limit(2),
            )
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[tokio::test]
    async fn filter_compares_numbers_by_value() {
        let store = MemoryStore::new();
        store.insert_one("things", doc! { "rating": 4_i64 }).await.unwrap();
        let count = store
            .count("things", &Filter::all().eq("rating", 4_i32))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn update_and_delete_report_matches() {
        let store = MemoryStore::new();
        let id = store.insert_one("things", doc! { "name": "a" }).await.unwrap();

        assert!(store
            .update_one("things", &Filter::by_id(id), doc! { "name": "b" })
            .await
            .unwrap());
        assert!(!store
            .update_one("things", &Filter::by_id(ObjectId::new()), doc! { "name": "c" })
            .await
            .unwrap());

        assert!(store.delete_one("things", &Filter::by_id(id)).await.unwrap());
        assert!(!store.delete_one("things", &Filter::by_id(id)).await.unwrap());
    }

    #[tokio::test]
    async fn proximity_orders_by_distance_and_annotates() {
        let store = MemoryStore::new();
        store.seed("places", point_doc("far", 37.7800, -122.4194));
        store.seed("places", point_doc("near", 37.7750, -122.4194));
        store.seed("places", point_doc("outside", 38.0, -122.4194));

        let pipeline = Pipeline::new().push(Stage::Proximity {
            center: to_point(37.7749, -122.4194),
            key: LocationField::Point,
            max_distance_m: 1000.0,
            spherical: true,
            distance_field: "distance",
        });
        let docs = store.aggregate("places", &pipeline).await.unwrap();

        let names: Vec<_> = docs.iter().map(|d| d.get_str("name").unwrap()).collect();
        assert_eq!(names, ["near", "far"]);
        let first = docs[0].get_f64("distance").unwrap();
        let second = docs[1].get_f64("distance").unwrap();
        assert!(first < second);
        assert!(first < 20.0);
    }

    #[tokio::test]
    async fn ensure_index_is_idempotent() {
        let store = MemoryStore::new();
        let index = SphericalIndex {
            field: "location",
            name: "location_2dsphere",
        };
        store.ensure_index("places", &index).await.unwrap();
        store.ensure_index("places", &index).await.unwrap();
        assert!(store.has_index("places", "location_2dsphere"));
        assert_eq!(store.index_count(), 1);
    }
}
