use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::info;

use crate::error::{ServerError, ServerResult};

/// Destination for uploaded assets inside the public static folder.
///
/// Files keep their client-supplied name (reduced to its last path
/// component) and replace any earlier upload of the same name.
#[derive(Clone, Debug)]
pub struct UploadStore {
    dir: PathBuf,
    url_prefix: String,
}

impl UploadStore {
    /// `dir` is where files land; `url_prefix` is the public URL segment
    /// that serves that directory.
    pub fn new(dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            url_prefix: url_prefix.into().trim_matches('/').to_string(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reduce a client file name to a safe single path component.
    pub fn sanitize_file_name(raw: &str) -> ServerResult<String> {
        let name = raw.rsplit(&['/', '\\'][..]).next().unwrap_or_default().trim();
        if name.is_empty() || name == "." || name == ".." || name.contains('\0') {
            return Err(ServerError::BadRequest(format!("invalid upload file name: {raw:?}")));
        }
        Ok(name.to_string())
    }

    /// Public URL path for a stored file name.
    pub fn url_for(&self, file_name: &str) -> String {
        if self.url_prefix.is_empty() {
            format!("/{file_name}")
        } else {
            format!("/{}/{file_name}", self.url_prefix)
        }
    }

    /// Store one uploaded file and return its public URL path.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> ServerResult<String> {
        let name = Self::sanitize_file_name(file_name)?;
        if !fs::try_exists(&self.dir).await? {
            fs::create_dir_all(&self.dir).await?;
        }
        fs::write(self.dir.join(&name), data).await?;
        let url = self.url_for(&name);
        info!(url = %url, bytes = data.len(), "asset uploaded");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize() {
        assert_eq!(UploadStore::sanitize_file_name("logo.png").unwrap(), "logo.png");
        assert_eq!(UploadStore::sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(UploadStore::sanitize_file_name("C:\\Users\\me\\pic.jpg").unwrap(), "pic.jpg");
        assert!(UploadStore::sanitize_file_name("").is_err());
        assert!(UploadStore::sanitize_file_name("..").is_err());
        assert!(UploadStore::sanitize_file_name("dir/").is_err());
    }

    #[test]
    fn urls() {
        let store = UploadStore::new("/tmp/x", "/uploaded/");
        assert_eq!(store.url_for("a.png"), "/uploaded/a.png");
        let bare = UploadStore::new("/tmp/x", "");
        assert_eq!(bare.url_for("a.png"), "/a.png");
    }

    #[tokio::test]
    async fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("public").join("uploaded");
        let store = UploadStore::new(&target, "uploaded");

        let url = store.save("hero.png", b"\x89PNG").await.unwrap();
        assert_eq!(url, "/uploaded/hero.png");
        assert_eq!(std::fs::read(target.join("hero.png")).unwrap(), b"\x89PNG");

        let again = store.save("nested/hero.png", b"v2").await.unwrap();
        assert_eq!(again, "/uploaded/hero.png");
        assert_eq!(std::fs::read(target.join("hero.png")).unwrap(), b"v2");
    }
}
