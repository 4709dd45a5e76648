use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tracing::debug;

use crate::document::Document;
use crate::error::StoreResult;
use crate::key::DocumentKey;
use crate::traits::{to_document_text, DocumentStore};
use crate::walk;

/// Filesystem-backed document store.
///
/// Every regular file below `root` is one document; its key is the file's
/// path relative to `root`. The root itself is created lazily on the first
/// write. The store keeps no state besides the root path, so any number of
/// instances (or processes) may point at the same directory.
#[derive(Clone, Debug)]
pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    /// Create a store rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the file backing `key`.
    pub fn path_of(&self, key: &DocumentKey) -> PathBuf {
        key.resolve(&self.root)
    }

    fn document_at(&self, path: &Path, content: String) -> StoreResult<Document> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is outside the data root", path.display()),
            )
        })?;
        Ok(Document::from_relative_path(relative, content)?)
    }
}

async fn read_file(path: PathBuf) -> StoreResult<(PathBuf, String)> {
    let content = fs::read_to_string(&path).await?;
    Ok((path, content))
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn load_all(&self) -> StoreResult<Vec<Document>> {
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || walk::list_files(&root)).await??;

        // Reads run in parallel; results are collected in walk order.
        let mut pending = files
            .into_iter()
            .map(|path| tokio::spawn(read_file(path)))
            .collect::<Vec<_>>()
            .into_iter();

        let mut documents = Vec::with_capacity(pending.len());
        while let Some(handle) = pending.next() {
            let read = match handle.await {
                Ok(read) => read,
                Err(e) => Err(e.into()),
            };
            match read.and_then(|(path, content)| self.document_at(&path, content)) {
                Ok(doc) => documents.push(doc),
                Err(err) => {
                    pending.for_each(|h| h.abort());
                    return Err(err);
                }
            }
        }

        debug!(root = %self.root.display(), count = documents.len(), "loaded snapshot");
        Ok(documents)
    }

    async fn upsert(&self, key: &DocumentKey, payload: &Value) -> StoreResult<()> {
        let target = self.path_of(key);
        let text = to_document_text(payload)?;

        if !fs::try_exists(&target).await? {
            if let Some(parent) = target.parent() {
                if !fs::try_exists(parent).await? {
                    fs::create_dir_all(parent).await?;
                    debug!(dir = %parent.display(), "created document directory");
                }
            }
            debug!(key = %key, "creating document");
        }

        fs::write(&target, text).await?;
        debug!(key = %key, "document written");
        Ok(())
    }

    async fn read(&self, key: &DocumentKey) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_of(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
