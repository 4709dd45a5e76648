//! Document keys and their resolution to filesystem paths.
//!
//! A key is a slash-delimited relative path such as `pages/home.json`.
//! Valid keys:
//! - Must be non-empty once an optional single leading `/` is removed
//! - Must not contain `\` or NUL
//! - Must not contain empty, `.` or `..` segments
//! - Must not end with `/`
//! - Every segment must be a plain path component on this platform
//!   (no drive letters, no UNC prefixes)
//!
//! These rules guarantee that a resolved key always stays below the data
//! root it is joined onto.

use std::fmt;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Characters that are forbidden anywhere in a key.
const FORBIDDEN_CHARS: &[char] = &['\\', '\0'];

/// Validated, normalized document key.
///
/// Stored without a leading separator and always `/`-delimited, regardless
/// of platform.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Parse and validate a raw key.
    ///
    /// A single leading `/` is accepted and stripped, so filenames taken from
    /// a snapshot can be written back unchanged.
    ///
    /// ```
    /// use pagestore_store::DocumentKey;
    ///
    /// assert_eq!(DocumentKey::parse("pages/home.json").unwrap().as_str(), "pages/home.json");
    /// assert_eq!(DocumentKey::parse("/pages/home.json").unwrap().as_str(), "pages/home.json");
    /// assert!(DocumentKey::parse("../etc/passwd").is_err());
    /// assert!(DocumentKey::parse("").is_err());
    /// ```
    pub fn parse(raw: &str) -> StoreResult<Self> {
        let key = raw.strip_prefix('/').unwrap_or(raw);

        if key.is_empty() {
            return Err(StoreError::invalid_key(raw, "key must not be empty"));
        }

        for ch in FORBIDDEN_CHARS {
            if key.contains(*ch) {
                return Err(StoreError::invalid_key(
                    raw,
                    format!("contains forbidden character: {ch:?}"),
                ));
            }
        }

        if key.ends_with('/') {
            return Err(StoreError::invalid_key(raw, "must not end with '/'"));
        }

        for segment in key.split('/') {
            match segment {
                "" => {
                    return Err(StoreError::invalid_key(raw, "path segments must not be empty"));
                }
                "." | ".." => {
                    return Err(StoreError::invalid_key(
                        raw,
                        format!("segment {segment:?} is not allowed"),
                    ));
                }
                _ => {}
            }
            let mut components = Path::new(segment).components();
            let plain = matches!(components.next(), Some(Component::Normal(_)))
                && components.next().is_none();
            if !plain {
                return Err(StoreError::invalid_key(
                    raw,
                    format!("segment {segment:?} is not a plain path component"),
                ));
            }
        }

        Ok(Self(key.to_string()))
    }

    /// The normalized key text (`/`-delimited, no leading separator).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate the key's path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// The directory part of the key, or `None` for a top-level document.
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(parent, _)| parent)
    }

    /// The final segment of the key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(self.0.as_str(), |(_, name)| name)
    }

    /// Join the key onto `root` using the platform separator.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.segments());
        path
    }

    /// Snapshot filename: the key with a leading separator, delimited by the
    /// platform separator.
    pub fn to_filename(&self) -> String {
        let mut filename = String::with_capacity(self.0.len() + 1);
        for segment in self.segments() {
            filename.push(MAIN_SEPARATOR);
            filename.push_str(segment);
        }
        filename
    }
}

/// Resolve an untrusted relative path below `root`, rejecting anything that
/// could escape it.
pub fn resolve_within(root: &Path, relative: &str) -> StoreResult<PathBuf> {
    Ok(DocumentKey::parse(relative)?.resolve(root))
}

impl fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentKey({})", self.0)
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.0
    }
}

impl AsRef<str> for DocumentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn valid_keys() {
        for key in ["home.json", "pages/home.json", "a/b/c/d.json", "with space.json", ".hidden"] {
            assert!(DocumentKey::parse(key).is_ok(), "expected valid: {key}");
        }
    }

    #[test]
    fn leading_slash_is_stripped() {
        let key = DocumentKey::parse("/pages/home.json").unwrap();
        assert_eq!(key.as_str(), "pages/home.json");
    }

    #[test]
    fn invalid_keys() {
        let cases = [
            "",
            "/",
            "//etc/passwd",
            "../secret.json",
            "pages/../../secret.json",
            "pages/./home.json",
            "pages//home.json",
            "pages/",
            "pages\\home.json",
            "nul\0byte",
        ];
        for key in cases {
            let err = DocumentKey::parse(key).unwrap_err();
            assert!(matches!(err, StoreError::InvalidKey { .. }), "expected invalid: {key:?}");
        }
    }

    #[test]
    fn parent_and_file_name() {
        let key = DocumentKey::parse("pages/blog/post.json").unwrap();
        assert_eq!(key.parent(), Some("pages/blog"));
        assert_eq!(key.file_name(), "post.json");

        let top = DocumentKey::parse("index.json").unwrap();
        assert_eq!(top.parent(), None);
        assert_eq!(top.file_name(), "index.json");
    }

    #[test]
    fn resolve_joins_under_root() {
        let root = Path::new("/srv/site/data");
        let key = DocumentKey::parse("pages/home.json").unwrap();
        assert_eq!(key.resolve(root), root.join("pages").join("home.json"));
    }

    #[test]
    fn filename_has_leading_separator() {
        let key = DocumentKey::parse("pages/home.json").unwrap();
        let expected = format!("{MAIN_SEPARATOR}pages{MAIN_SEPARATOR}home.json");
        assert_eq!(key.to_filename(), expected);
    }

    #[test]
    fn resolve_within_rejects_traversal() {
        let root = Path::new("/srv/assets");
        assert!(resolve_within(root, "themes/preview.png").is_ok());
        assert!(resolve_within(root, "../../etc/shadow").is_err());
    }

    #[test]
    fn serde_validates() {
        let key: DocumentKey = serde_json::from_str("\"pages/home.json\"").unwrap();
        assert_eq!(key.as_str(), "pages/home.json");
        assert!(serde_json::from_str::<DocumentKey>("\"../x\"").is_err());
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"pages/home.json\"");
    }

    proptest! {
        #[test]
        fn accepted_keys_stay_under_root(raw in "[a-z./]{0,24}") {
            let root = Path::new("/data");
            if let Ok(key) = DocumentKey::parse(&raw) {
                let resolved = key.resolve(root);
                prop_assert!(resolved.starts_with(root));
                prop_assert!(resolved != root);
                prop_assert!(resolved
                    .components()
                    .all(|c| !matches!(c, Component::ParentDir | Component::CurDir)));
            }
        }

        #[test]
        fn parse_is_idempotent(raw in "/?[a-z]{1,8}(/[a-z]{1,8}){0,4}") {
            let key = DocumentKey::parse(&raw).unwrap();
            let again = DocumentKey::parse(key.as_str()).unwrap();
            prop_assert_eq!(key, again);
        }
    }
}
