use std::io;
use std::path::{Component, Path, MAIN_SEPARATOR};

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::key::DocumentKey;

/// One stored document as it appears in a snapshot.
///
/// `filename` is the document key with a leading separator
/// (`/pages/home.json`); `content` is the raw file text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub filename: String,
    pub content: String,
}

impl Document {
    pub fn new(key: &DocumentKey, content: impl Into<String>) -> Self {
        Self {
            filename: key.to_filename(),
            content: content.into(),
        }
    }

    /// Snapshot entry for a file found by walking the data root.
    ///
    /// `relative` is the file's path below the root. It is not checked
    /// against the key rules: any regular file under the root is a document,
    /// even one whose name a client could not write.
    pub fn from_relative_path(relative: &Path, content: impl Into<String>) -> io::Result<Self> {
        let mut filename = String::new();
        for component in relative.components() {
            let Component::Normal(part) = component else {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} is not below the data root", relative.display()),
                ));
            };
            let part = part.to_str().ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("file name {} is not valid UTF-8", relative.display()),
                )
            })?;
            filename.push(MAIN_SEPARATOR);
            filename.push_str(part);
        }
        if filename.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "empty path below the data root",
            ));
        }
        Ok(Self {
            filename,
            content: content.into(),
        })
    }

    /// Recover the key this document was stored under.
    pub fn key(&self) -> StoreResult<DocumentKey> {
        DocumentKey::parse(&self.filename.replace(MAIN_SEPARATOR, "/"))
    }

    /// Parse the content as JSON.
    pub fn json(&self) -> StoreResult<serde_json::Value> {
        serde_json::from_str(&self.content).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Upsert request body: the target key and the value to store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpsertRequest {
    pub path: String,
    pub data: serde_json::Value,
}
