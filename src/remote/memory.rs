//! In-memory remote store.
//!
//! A process-local [`RemoteStore`] implementation with the same
//! observable semantics as the cloud document store: field-level merge
//! upserts, owner-scoped queries, and atomic batch deletes. Used by the
//! test suite and for offline development.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use super::{Collection, DocumentRef, RemoteError, RemoteStore};

type CollectionMap = HashMap<Collection, BTreeMap<String, Value>>;

#[derive(Default)]
pub struct InMemoryRemote {
    collections: Mutex<CollectionMap>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, CollectionMap>, RemoteError> {
        self.collections
            .lock()
            .map_err(|_| RemoteError::Other("remote store lock poisoned".to_string()))
    }

    /// Fetch one document by key, regardless of owner.
    pub fn document(&self, collection: Collection, key: &str) -> Option<Value> {
        self.collections
            .lock()
            .ok()?
            .get(&collection)
            .and_then(|docs| docs.get(key))
            .cloned()
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .lock()
            .map(|c| c.get(&collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

fn owner_of(doc: &Value) -> Option<&str> {
    doc.get("owner_id").and_then(Value::as_str)
}

fn is_tombstone(doc: &Value) -> bool {
    doc.get("is_deleted").and_then(Value::as_bool).unwrap_or(false)
}

fn modified_at(doc: &Value) -> Option<DateTime<Utc>> {
    let raw = doc.get("last_modified").and_then(Value::as_str)?;
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl RemoteStore for InMemoryRemote {
    async fn merge_upsert(&self, collection: Collection, key: &str, document: Value) -> Result<(), RemoteError> {
        let incoming = match document {
            Value::Object(map) => map,
            other => {
                return Err(RemoteError::InvalidData(format!(
                    "expected a document object, got {other}"
                )))
            }
        };

        let mut collections = self.lock()?;
        let docs = collections.entry(collection).or_default();
        match docs.get_mut(key) {
            // Field-level merge into the existing document
            Some(Value::Object(existing)) => {
                for (field, value) in incoming {
                    existing.insert(field, value);
                }
            }
            _ => {
                docs.insert(key.to_string(), Value::Object(incoming));
            }
        }
        Ok(())
    }

    async fn query_by_owner(&self, collection: Collection, owner_id: &str) -> Result<Vec<Value>, RemoteError> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| owner_of(doc) == Some(owner_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn query_tombstones_older_than(
        &self,
        collection: Collection,
        owner_id: &str,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<DocumentRef>, RemoteError> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| {
                        owner_of(doc) == Some(owner_id)
                            && is_tombstone(doc)
                            && modified_at(doc).is_some_and(|at| at < threshold)
                    })
                    .map(|(key, _)| DocumentRef {
                        collection,
                        key: key.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn batch_delete(&self, refs: Vec<DocumentRef>) -> Result<(), RemoteError> {
        let mut collections = self.lock()?;
        for doc_ref in refs {
            if let Some(docs) = collections.get_mut(&doc_ref.collection) {
                docs.remove(&doc_ref.key);
            }
        }
        Ok(())
    }
}
