//! Key-addressed blob storage.
//!
//! [`StorageBackend`] abstracts the store the export engine writes theme
//! files and archives to. Keys are `/`-separated relative paths. The only
//! shipped backend is [`local::LocalStorage`]; the trait seam exists so an
//! object-store backend can be added without touching the export engine.

pub mod local;

pub use local::LocalStorage;

/// Errors surfaced by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A key-addressed blob store.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write `bytes` at `key`, creating parent directories as needed and
    /// overwriting any existing object.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read the object at `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Whether an object exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Size in bytes of the object at `key`.
    async fn size(&self, key: &str) -> Result<u64, StorageError>;

    /// Delete the object at `key`. Deleting a missing object is not an
    /// error (idempotent).
    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// List the keys of objects directly under `dir_prefix`.
    async fn list(&self, dir_prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Create a directory (and parents) at `key`.
    async fn make_dir(&self, key: &str) -> Result<(), StorageError>;

    /// Recursively delete the directory at `key`. Deleting a missing
    /// directory is not an error.
    async fn delete_dir(&self, key: &str) -> Result<(), StorageError>;
}
