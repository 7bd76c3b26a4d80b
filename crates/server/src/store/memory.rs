//! In-process document store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{
    CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter, Fields, StoreError,
    new_document_id,
};

/// A document store held in memory.
///
/// Cheaply cloneable; clones share the same data. Contents are lost when
/// the last clone is dropped.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    documents: HashMap<DocumentPath, Entry>,
    next_seq: u64,
}

struct Entry {
    seq: u64,
    fields: Fields,
}

impl Inner {
    fn insert(&mut self, path: DocumentPath, fields: Fields) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.documents.insert(path, Entry { seq, fields });
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections.
    pub async fn len(&self) -> usize {
        self.inner.read().await.documents.len()
    }

    /// Whether the store holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.documents.is_empty()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.documents.get(path).map(|entry| Document {
            path: path.clone(),
            fields: entry.fields.clone(),
        }))
    }

    async fn set_document(
        &self,
        path: &DocumentPath,
        fields: Fields,
        merge: bool,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        match inner.documents.get_mut(path) {
            Some(entry) if merge => entry.fields.extend(fields),
            Some(entry) => entry.fields = fields,
            None => inner.insert(path.clone(), fields),
        }
        Ok(())
    }

    async fn add_document(
        &self,
        collection: &CollectionPath,
        fields: Fields,
    ) -> Result<DocumentPath, StoreError> {
        let path = collection.doc(&new_document_id())?;
        self.inner.write().await.insert(path.clone(), fields);
        Ok(path)
    }

    async fn create_document(
        &self,
        path: &DocumentPath,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.documents.contains_key(path) {
            return Err(StoreError::AlreadyExists(path.clone()));
        }
        inner.insert(path.clone(), fields);
        Ok(())
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StoreError> {
        self.inner.write().await.documents.remove(path);
        Ok(())
    }

    async fn query_collection(
        &self,
        collection: &CollectionPath,
        filter: Option<&FieldFilter>,
    ) -> Result<Vec<Document>, StoreError> {
        let inner = self.inner.read().await;
        let mut matches: Vec<(u64, Document)> = inner
            .documents
            .iter()
            .filter(|(path, _)| path.parent() == *collection)
            .filter(|(_, entry)| filter.is_none_or(|f| f.matches(&entry.fields)))
            .map(|(path, entry)| {
                (
                    entry.seq,
                    Document {
                        path: path.clone(),
                        fields: entry.fields.clone(),
                    },
                )
            })
            .collect();

        matches.sort_by_key(|(seq, _)| *seq);
        Ok(matches.into_iter().map(|(_, doc)| doc).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn fields(value: Value) -> Fields {
        match value {
            Value::Object(map) => map,
            _ => Fields::new(),
        }
    }

    fn vendors() -> CollectionPath {
        CollectionPath::root("vendors").unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        let path = vendors().doc("nope").unwrap();
        assert!(store.get_document(&path).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_merge_keeps_other_fields() {
        let store = MemoryStore::new();
        let path = vendors().doc("v1").unwrap();

        store
            .set_document(&path, fields(json!({"a": 1, "b": 2})), false)
            .await
            .unwrap();
        store
            .set_document(&path, fields(json!({"b": 3})), true)
            .await
            .unwrap();

        let doc = store.get_document(&path).await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.fields), json!({"a": 1, "b": 3}));
    }

    #[tokio::test]
    async fn test_set_without_merge_replaces() {
        let store = MemoryStore::new();
        let path = vendors().doc("v1").unwrap();

        store
            .set_document(&path, fields(json!({"a": 1, "b": 2})), false)
            .await
            .unwrap();
        store
            .set_document(&path, fields(json!({"b": 3})), false)
            .await
            .unwrap();

        let doc = store.get_document(&path).await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.fields), json!({"b": 3}));
    }

    #[tokio::test]
    async fn test_create_document_is_exclusive() {
        let store = MemoryStore::new();
        let path = CollectionPath::root("vendorOwners")
            .unwrap()
            .doc("u1")
            .unwrap();

        store
            .create_document(&path, fields(json!({"vendorId": "v1"})))
            .await
            .unwrap();
        let second = store
            .create_document(&path, fields(json!({"vendorId": "v2"})))
            .await;

        assert!(matches!(second, Err(StoreError::AlreadyExists(_))));
        let doc = store.get_document(&path).await.unwrap().unwrap();
        assert_eq!(doc.fields["vendorId"], "v1");
    }

    #[tokio::test]
    async fn test_query_is_scoped_and_ordered() {
        let store = MemoryStore::new();
        let first = store
            .add_document(&vendors(), fields(json!({"userId": "u1"})))
            .await
            .unwrap();
        let second = store
            .add_document(&vendors(), fields(json!({"userId": "u2"})))
            .await
            .unwrap();
        // Nested documents are not part of the parent collection.
        let items = first.collection("items").unwrap();
        store
            .add_document(&items, fields(json!({"name": "Chai"})))
            .await
            .unwrap();

        let all = store.query_collection(&vendors(), None).await.unwrap();
        let ids: Vec<&str> = all.iter().map(Document::id).collect();
        assert_eq!(ids, vec![first.id(), second.id()]);

        let filter = FieldFilter::eq("userId", "u2");
        let only = store
            .query_collection(&vendors(), Some(&filter))
            .await
            .unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].id(), second.id());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryStore::new();
        let path = store
            .add_document(&vendors(), Fields::new())
            .await
            .unwrap();

        store.delete_document(&path).await.unwrap();
        store.delete_document(&path).await.unwrap();
        assert!(store.is_empty().await);
    }
}
