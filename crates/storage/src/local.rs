//! Local-filesystem storage backend.

use std::path::{Component, Path, PathBuf};

use crate::{StorageBackend, StorageError};

/// Blob store rooted at a base directory on the local filesystem.
///
/// Keys resolve strictly inside the root; any key containing a parent-dir
/// component or an absolute path is rejected.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve a key to a path under the root.
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(key);
        if rel.is_absolute() {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
                reason: "absolute paths are not allowed".into(),
            });
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(StorageError::InvalidKey {
                        key: key.to_string(),
                        reason: "path must stay within the storage root".into(),
                    })
                }
            }
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }

    async fn size(&self, key: &str) -> Result<u64, StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, dir_prefix: &str) -> Result<Vec<String>, StorageError> {
        let dir = self.resolve(dir_prefix)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                let name = entry.file_name().to_string_lossy().into_owned();
                let prefix = dir_prefix.trim_end_matches('/');
                keys.push(if prefix.is_empty() {
                    name
                } else {
                    format!("{prefix}/{name}")
                });
            }
        }
        keys.sort();
        Ok(keys)
    }

    async fn make_dir(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        tokio::fs::create_dir_all(&path).await?;
        Ok(())
    }

    async fn delete_dir(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, LocalStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        (dir, storage)
    }

    #[tokio::test]
    async fn put_get_round_trip() {
        let (_dir, storage) = storage();
        storage.put("exports/theme/style.css", b"body {}").await.unwrap();
        let bytes = storage.get("exports/theme/style.css").await.unwrap();
        assert_eq!(bytes, b"body {}");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (_dir, storage) = storage();
        let err = storage.get("missing.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn exists_and_size() {
        let (_dir, storage) = storage();
        assert!(!storage.exists("a.txt").await.unwrap());
        storage.put("a.txt", b"12345").await.unwrap();
        assert!(storage.exists("a.txt").await.unwrap());
        assert_eq!(storage.size("a.txt").await.unwrap(), 5);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (_dir, storage) = storage();
        storage.put("a.txt", b"x").await.unwrap();
        storage.delete("a.txt").await.unwrap();
        assert!(!storage.exists("a.txt").await.unwrap());
        // Second delete of the same key must not error.
        storage.delete("a.txt").await.unwrap();
    }

    #[tokio::test]
    async fn list_returns_files_under_prefix() {
        let (_dir, storage) = storage();
        storage.put("exports/t/style.css", b"a").await.unwrap();
        storage.put("exports/t/header.php", b"b").await.unwrap();
        storage.make_dir("exports/t/nested").await.unwrap();

        let keys = storage.list("exports/t").await.unwrap();
        assert_eq!(keys, vec!["exports/t/header.php", "exports/t/style.css"]);
    }

    #[tokio::test]
    async fn list_missing_dir_is_empty() {
        let (_dir, storage) = storage();
        assert!(storage.list("nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_dir_removes_recursively() {
        let (_dir, storage) = storage();
        storage.put("exports/t/style.css", b"a").await.unwrap();
        storage.delete_dir("exports/t").await.unwrap();
        assert!(!storage.exists("exports/t/style.css").await.unwrap());
        // Missing directory is fine.
        storage.delete_dir("exports/t").await.unwrap();
    }

    #[tokio::test]
    async fn traversal_keys_rejected() {
        let (_dir, storage) = storage();
        assert!(matches!(
            storage.get("../outside.txt").await.unwrap_err(),
            StorageError::InvalidKey { .. }
        ));
        assert!(matches!(
            storage.put("/etc/passwd", b"x").await.unwrap_err(),
            StorageError::InvalidKey { .. }
        ));
    }
}
