use std::io;
use std::path::Path;

use pagestore_store::resolve_within;
use tokio::fs;

use crate::error::{ServerError, ServerResult};

/// Content type from a file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("json") => "application/json",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("html" | "htm") => "text/html; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Read an asset below `root`. Paths that would leave `root` are rejected.
pub async fn read_asset(root: &Path, relative: &str) -> ServerResult<(Vec<u8>, &'static str)> {
    let path = resolve_within(root, relative)?;
    match fs::read(&path).await {
        Ok(bytes) => Ok((bytes, content_type_for(&path))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ServerError::AssetNotFound(relative.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
