use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::auth::RuntimeMode;
use crate::error::{ServerError, ServerResult};

/// Server configuration.
///
/// All directories are relative to `root` unless absolute. Every field has a
/// default, so a TOML file only needs the keys it changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Project root; the other directories hang off it.
    pub root: PathBuf,
    /// Document data root.
    pub data_dir: PathBuf,
    /// Public static folder.
    pub public_dir: PathBuf,
    /// Upload folder name inside `public_dir`, also its URL prefix.
    pub upload_dir: String,
    /// Directory served by the asset endpoint.
    pub assets_dir: PathBuf,
    pub mode: RuntimeMode,
    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 12785)),
            root: PathBuf::from("."),
            data_dir: PathBuf::from("data"),
            public_dir: PathBuf::from("public"),
            upload_dir: "uploaded".into(),
            assets_dir: PathBuf::from("assets"),
            mode: RuntimeMode::Development,
            max_body_bytes: 50 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML configuration.
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply `PAGESTORE_ENV` on top of the configured mode.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(mode) = RuntimeMode::from_env() {
            self.mode = mode;
        }
        self
    }

    pub fn data_root(&self) -> PathBuf {
        self.root.join(&self.data_dir)
    }

    pub fn upload_root(&self) -> PathBuf {
        self.root.join(&self.public_dir).join(&self.upload_dir)
    }

    pub fn assets_root(&self) -> PathBuf {
        self.root.join(&self.assets_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:12785".parse::<SocketAddr>().unwrap());
        assert_eq!(c.mode, RuntimeMode::Development);
        assert_eq!(c.data_root(), PathBuf::from(".").join("data"));
        assert_eq!(c.upload_root(), PathBuf::from(".").join("public").join("uploaded"));
        assert_eq!(c.max_body_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn partial_toml() {
        let c = ServerConfig::from_toml_str(
            r#"
            root = "/srv/site"
            mode = "production"
            "#,
        )
        .unwrap();
        assert_eq!(c.root, PathBuf::from("/srv/site"));
        assert_eq!(c.mode, RuntimeMode::Production);
        assert_eq!(c.data_root(), PathBuf::from("/srv/site/data"));
        assert_eq!(c.upload_dir, "uploaded");
    }

    #[test]
    fn full_toml() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            root = "site"
            data_dir = "content"
            public_dir = "static"
            upload_dir = "media"
            assets_dir = "builder"
            mode = "development"
            max_body_bytes = 1024
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.data_root(), PathBuf::from("site/content"));
        assert_eq!(c.upload_root(), PathBuf::from("site/static/media"));
        assert_eq!(c.assets_root(), PathBuf::from("site/builder"));
        assert_eq!(c.max_body_bytes, 1024);
    }

    #[test]
    fn bad_toml() {
        let err = ServerConfig::from_toml_str("mode = \"staging\"").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pagestore.toml");
        std::fs::write(&path, "upload_dir = \"files\"\n").unwrap();
        let c = ServerConfig::load(&path).unwrap();
        assert_eq!(c.upload_dir, "files");

        let missing = ServerConfig::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ServerError::Config(_)));
    }
}
