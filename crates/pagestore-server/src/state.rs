use std::path::PathBuf;
use std::sync::Arc;

use pagestore_store::{DocumentStore, FsDocumentStore};

use crate::auth::RuntimeMode;
use crate::config::ServerConfig;
use crate::upload::UploadStore;

/// Shared request state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub uploads: UploadStore,
    pub assets_root: PathBuf,
    pub mode: RuntimeMode,
    pub max_body_bytes: usize,
}

impl AppState {
    /// State backed by the filesystem locations named in `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_store(config, Arc::new(FsDocumentStore::new(config.data_root())))
    }

    /// State with a caller-supplied document store.
    pub fn with_store(config: &ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            uploads: UploadStore::new(config.upload_root(), config.upload_dir.clone()),
            assets_root: config.assets_root(),
            mode: config.mode,
            max_body_bytes: config.max_body_bytes,
        }
    }
}
