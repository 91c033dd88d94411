//! Durable storage for generated documents.
//!
//! Carried in `AppState` as `Arc<dyn DocumentStore>`. Every document is written
//! exactly once under a name nobody else uses, so backends need no locking:
//! readers either see a complete document or nothing.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use local::LocalDirStore;
pub use s3::S3Store;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid document name '{0}'")]
    InvalidName(String),

    #[error("document '{0}' already exists")]
    AlreadyExists(String),

    #[error("storage I/O failed for '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("object storage request failed for '{name}': {message}")]
    Remote { name: String, message: String },
}

/// Where a document ended up after a successful `put`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Absolute path or `s3://bucket/key`.
    pub location: String,
    pub size: usize,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Makes sure the backing location exists. Idempotent; called once at startup.
    async fn init(&self) -> Result<(), StorageError>;

    /// Durably writes `bytes` under `name`. Returns only after the write is
    /// committed; on error nothing is retrievable under `name`.
    async fn put(&self, name: &str, bytes: Bytes) -> Result<StoredObject, StorageError>;

    /// Reads a previously stored document. `Ok(None)` when it does not exist.
    async fn fetch(&self, name: &str) -> Result<Option<Bytes>, StorageError>;
}

/// Accepts only flat names made of ASCII alphanumerics, `_`, `-` and `.`,
/// not starting with a dot. Rejects anything that could address outside the
/// storage root.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
pub(crate) mod memory {
    //! In-memory store for pipeline and handler tests, with switchable write
    //! failure.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        objects: Mutex<HashMap<String, Bytes>>,
        fail_writes: AtomicBool,
    }

    impl MemoryStore {
        pub fn failing() -> Self {
            let store = Self::default();
            store.fail_writes.store(true, Ordering::SeqCst);
            store
        }

        pub fn len(&self) -> usize {
            self.objects.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn init(&self) -> Result<(), StorageError> {
            Ok(())
        }

        async fn put(&self, name: &str, bytes: Bytes) -> Result<StoredObject, StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Io {
                    name: name.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            let size = bytes.len();
            let mut objects = self.objects.lock().unwrap();
            if objects.contains_key(name) {
                return Err(StorageError::AlreadyExists(name.to_string()));
            }
            objects.insert(name.to_string(), bytes);
            Ok(StoredObject {
                location: format!("memory://{name}"),
                size,
            })
        }

        async fn fetch(&self, name: &str) -> Result<Option<Bytes>, StorageError> {
            Ok(self.objects.lock().unwrap().get(name).cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names_are_safe() {
        assert!(is_safe_filename("SmartCV_1718000000000_0f8fad5bd9cb469fa16570867728950e.pdf"));
        assert!(is_safe_filename("resume-1.pdf"));
    }

    #[test]
    fn test_traversal_and_hidden_names_rejected() {
        for name in ["", "../etc/passwd", "a/b.pdf", "a\\b.pdf", ".hidden", "..", "x..pdf", "a b.pdf", "%2e%2e"] {
            assert!(!is_safe_filename(name), "{name:?} should be rejected");
        }
    }

    #[test]
    fn test_overlong_name_rejected() {
        assert!(!is_safe_filename(&"a".repeat(256)));
    }
}
