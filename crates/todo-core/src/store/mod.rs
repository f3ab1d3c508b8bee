//! Remote document store abstraction for todo documents.

mod firestore;
mod memory;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{TodoDocument, TodoId, TodoPatch};
use crate::Result;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Identity and server timestamp assigned to a newly created document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedDocument {
    pub id: TodoId,
    pub created_at: Option<DateTime<Utc>>,
}

/// Trait for remote todo storage operations (async)
///
/// Every failure surfaces as an error with a human-readable message; no call
/// is retried here.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Create a document; the store assigns its identity
    async fn create(&self, collection: &str, document: &TodoDocument) -> Result<CreatedDocument>;

    /// Apply a partial update to an existing document
    async fn update(&self, collection: &str, id: &TodoId, patch: &TodoPatch) -> Result<()>;

    /// Delete a document
    async fn delete(&self, collection: &str, id: &TodoId) -> Result<()>;

    /// Fetch every document in the collection, in store order
    async fn list_all(&self, collection: &str) -> Result<Vec<(TodoId, TodoDocument)>>;
}

impl<T: RemoteStore> RemoteStore for Arc<T> {
    async fn create(&self, collection: &str, document: &TodoDocument) -> Result<CreatedDocument> {
        (**self).create(collection, document).await
    }

    async fn update(&self, collection: &str, id: &TodoId, patch: &TodoPatch) -> Result<()> {
        (**self).update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &TodoId) -> Result<()> {
        (**self).delete(collection, id).await
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<(TodoId, TodoDocument)>> {
        (**self).list_all(collection).await
    }
}
