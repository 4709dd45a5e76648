use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// Recursively list every regular file beneath `root`.
///
/// Returns an empty list when `root` does not exist. Directories are not
/// yielded, and symbolic links are neither followed nor yielded, so a
/// symlink cycle cannot trap the walk.
///
/// The walk is synchronous; async callers should run it on a blocking
/// thread.
pub fn list_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("data root {} is not a directory", root.display()),
            ));
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(root = %root.display(), "data root absent; nothing to list");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e),
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            // Root removed between the metadata check and the walk.
            Err(e) if e.depth() == 0 && is_not_found(&e) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "listed data root");
    Ok(files)
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut files: Vec<PathBuf>, root: &Path) -> Vec<PathBuf> {
        files.sort();
        files
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect()
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_files(&dir.path().join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn empty_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn nested_files_are_listed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("top.json"), "{}").unwrap();
        fs::write(root.join("a/one.json"), "{}").unwrap();
        fs::write(root.join("a/b/c/deep.json"), "{}").unwrap();

        let files = sorted(list_files(root).unwrap(), root);
        assert_eq!(
            files,
            vec![
                PathBuf::from("a/b/c/deep.json"),
                PathBuf::from("a/one.json"),
                PathBuf::from("top.json"),
            ]
        );
    }

    #[test]
    fn empty_directories_are_not_listed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("empty/nested")).unwrap();
        assert!(list_files(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn root_that_is_a_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data");
        fs::write(&file, "x").unwrap();
        let err = list_files(&file).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[test]
    fn symlink_cycle_is_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/doc.json"), "{}").unwrap();
        std::os::unix::fs::symlink(root, root.join("a/loop")).unwrap();
        std::os::unix::fs::symlink(root.join("a/doc.json"), root.join("alias.json")).unwrap();

        let files = sorted(list_files(root).unwrap(), root);
        assert_eq!(files, vec![PathBuf::from("a/doc.json")]);
    }
}
