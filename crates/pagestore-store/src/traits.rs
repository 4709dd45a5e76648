use async_trait::async_trait;
use serde_json::Value;

use crate::document::Document;
use crate::error::StoreResult;
use crate::key::DocumentKey;

/// Path-addressed document store.
///
/// All implementations must satisfy these invariants:
/// - Every key maps to exactly one document.
/// - `upsert` creates the document if absent and replaces its content in
///   full otherwise. There is no partial or patch write.
/// - An empty or absent store yields an empty snapshot, never an error.
/// - A snapshot is all-or-nothing: any failed read aborts `load_all`.
/// - Concurrent upserts to one key are last-writer-wins; the store holds no
///   cross-request locks.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read every stored document.
    async fn load_all(&self) -> StoreResult<Vec<Document>>;

    /// Create or overwrite the document at `key` with the JSON text of
    /// `payload`.
    async fn upsert(&self, key: &DocumentKey, payload: &Value) -> StoreResult<()>;

    /// Read a single document's text.
    ///
    /// Returns `Ok(None)` if no document is stored at `key`.
    async fn read(&self, key: &DocumentKey) -> StoreResult<Option<String>>;
}

/// Serialize a payload to the compact JSON text stored on disk.
pub(crate) fn to_document_text(payload: &Value) -> StoreResult<String> {
    serde_json::to_string(payload)
        .map_err(|e| crate::error::StoreError::Serialization(e.to_string()))
}
