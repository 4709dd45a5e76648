use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::document::Document;
use crate::error::StoreResult;
use crate::key::DocumentKey;
use crate::traits::{to_document_text, DocumentStore};

/// In-memory, BTreeMap-based document store.
///
/// Intended for tests and embedding. Documents are held as their serialized
/// text behind a `RwLock`; snapshots come out in key order.
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<DocumentKey, String>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.documents.read().expect("lock poisoned").is_empty()
    }

    /// Insert raw text without JSON serialization, as if written by an
    /// external tool.
    pub fn insert_raw(&self, key: DocumentKey, content: impl Into<String>) {
        self.documents
            .write()
            .expect("lock poisoned")
            .insert(key, content.into());
    }

    /// Remove all documents from the store.
    pub fn clear(&self) {
        self.documents.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load_all(&self) -> StoreResult<Vec<Document>> {
        let map = self.documents.read().expect("lock poisoned");
        Ok(map
            .iter()
            .map(|(key, content)| Document::new(key, content.clone()))
            .collect())
    }

    async fn upsert(&self, key: &DocumentKey, payload: &Value) -> StoreResult<()> {
        let text = to_document_text(payload)?;
        self.documents
            .write()
            .expect("lock poisoned")
            .insert(key.clone(), text);
        Ok(())
    }

    async fn read(&self, key: &DocumentKey) -> StoreResult<Option<String>> {
        let map = self.documents.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &self.len())
            .finish()
    }
}
