//! In-process store, used by tests and local runs without a backend.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use super::{CreatedDocument, RemoteStore};
use crate::models::{TodoDocument, TodoId, TodoPatch};
use crate::{Error, Result};

type Collection = Vec<(TodoId, TodoDocument)>;

/// Insertion-ordered in-memory document store
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<String, Collection>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in `collection`
    pub async fn len(&self, collection: &str) -> usize {
        let collections = self.collections.lock().await;
        collections.get(collection).map_or(0, Vec::len)
    }

    /// Fetch one stored document
    pub async fn get(&self, collection: &str, id: &TodoId) -> Option<TodoDocument> {
        let collections = self.collections.lock().await;
        collections
            .get(collection)?
            .iter()
            .find(|(doc_id, _)| doc_id == id)
            .map(|(_, document)| document.clone())
    }
}

impl RemoteStore for MemoryStore {
    async fn create(&self, collection: &str, document: &TodoDocument) -> Result<CreatedDocument> {
        let id = TodoId::generate();
        let created_at = Utc::now();
        let mut stored = document.clone();
        stored.created_at = Some(created_at);

        let mut collections = self.collections.lock().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), stored));

        Ok(CreatedDocument {
            id,
            created_at: Some(created_at),
        })
    }

    async fn update(&self, collection: &str, id: &TodoId, patch: &TodoPatch) -> Result<()> {
        let mut collections = self.collections.lock().await;
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|(doc_id, _)| doc_id == id))
            .map(|(_, document)| document)
            .ok_or_else(|| Error::Remote(format!("No document to update: {collection}/{id}")))?;

        patch.apply_to(document);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &TodoId) -> Result<()> {
        let mut collections = self.collections.lock().await;
        if let Some(documents) = collections.get_mut(collection) {
            documents.retain(|(doc_id, _)| doc_id != id);
        }
        Ok(())
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<(TodoId, TodoDocument)>> {
        let collections = self.collections.lock().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let store = MemoryStore::new();
        let created = store
            .create("tasks", &TodoDocument::new("Buy milk", None))
            .await
            .unwrap();

        assert!(created.created_at.is_some());
        let stored = store.get("tasks", &created.id).await.unwrap();
        assert_eq!(stored.text, "Buy milk");
        assert_eq!(stored.created_at, created.created_at);
    }

    #[tokio::test]
    async fn list_preserves_insertion_order_per_collection() {
        let store = MemoryStore::new();
        store.create("tasks", &TodoDocument::new("one", None)).await.unwrap();
        store.create("other", &TodoDocument::new("elsewhere", None)).await.unwrap();
        store.create("tasks", &TodoDocument::new("two", None)).await.unwrap();

        let texts: Vec<String> = store
            .list_all("tasks")
            .await
            .unwrap()
            .into_iter()
            .map(|(_, document)| document.text)
            .collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn update_missing_document_fails() {
        let store = MemoryStore::new();
        let error = store
            .update("tasks", &TodoId::generate(), &TodoPatch::done(true))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("No document to update"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        let created = store.create("tasks", &TodoDocument::new("x", None)).await.unwrap();

        store.delete("tasks", &created.id).await.unwrap();
        store.delete("tasks", &created.id).await.unwrap();
        assert_eq!(store.len("tasks").await, 0);
    }
}
