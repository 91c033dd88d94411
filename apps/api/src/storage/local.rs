//! Local-directory backend.
//!
//! Writes go to a `NamedTempFile` inside the storage directory, are synced to
//! disk, then renamed onto the final name with `persist_noclobber`. The rename
//! is atomic on the same filesystem, so a half-written file is never visible
//! under a public name; a failed write leaves only the temp file, which
//! `tempfile` deletes on drop. The directory is synced after the rename.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::storage::{is_safe_filename, DocumentStore, StorageError, StoredObject};

#[derive(Debug, Clone)]
pub struct LocalDirStore {
    dir: PathBuf,
}

impl LocalDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn io_err(name: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        name: name.to_string(),
        source,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Atomic write protocol
// ────────────────────────────────────────────────────────────────────────────

/// Writes `bytes` to a `.partial-*` temp file in `dir` using `fill`, syncs it,
/// renames it onto `target` without clobbering, then syncs `dir` so the new
/// name is durable. If the directory sync fails the renamed file is removed
/// again, so an `Err` never leaves a document under `target`.
fn write_atomic(
    dir: &Path,
    target: &Path,
    name: &str,
    bytes: &[u8],
    fill: impl FnOnce(&mut NamedTempFile, &[u8]) -> std::io::Result<()>,
) -> Result<(), StorageError> {
    let mut tmp: NamedTempFile = tempfile::Builder::new()
        .prefix(".partial-")
        .tempfile_in(dir)
        .map_err(|e| io_err(name, e))?;
    fill(&mut tmp, bytes).map_err(|e| io_err(name, e))?;
    tmp.flush().map_err(|e| io_err(name, e))?;
    tmp.as_file().sync_all().map_err(|e| io_err(name, e))?;
    tmp.persist_noclobber(target).map_err(|e| {
        if e.error.kind() == std::io::ErrorKind::AlreadyExists {
            StorageError::AlreadyExists(name.to_string())
        } else {
            io_err(name, e.error)
        }
    })?;

    if let Err(e) = std::fs::File::open(dir).and_then(|d| d.sync_all()) {
        if let Err(remove) = std::fs::remove_file(target) {
            warn!("Could not remove unsynced {}: {remove}", target.display());
        }
        return Err(io_err(name, e));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// DocumentStore implementation
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl DocumentStore for LocalDirStore {
    async fn init(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_err(&self.dir.display().to_string(), e))?;
        info!("Storage directory ready: {}", self.dir().display());
        Ok(())
    }

    async fn put(&self, name: &str, bytes: Bytes) -> Result<StoredObject, StorageError> {
        if !is_safe_filename(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }

        let size = bytes.len();
        let dir = self.dir.clone();
        let target = self.dir.join(name);
        let owned_name = name.to_string();

        // Blocking filesystem work; the caller awaits the outcome of the full write.
        let location = tokio::task::spawn_blocking(move || -> Result<PathBuf, StorageError> {
            write_atomic(&dir, &target, &owned_name, &bytes, |f, b| f.write_all(b))?;
            Ok(target)
        })
        .await
        .map_err(|e| StorageError::Io {
            name: name.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, e),
        })??;

        // Committed. Nothing below may fail.
        let location = tokio::fs::canonicalize(&location)
            .await
            .unwrap_or_else(|_| location.clone());
        debug!("Wrote {} ({} bytes)", location.display(), size);

        Ok(StoredObject {
            location: location.display().to_string(),
            size,
        })
    }

    async fn fetch(&self, name: &str) -> Result<Option<Bytes>, StorageError> {
        if !is_safe_filename(name) {
            return Ok(None);
        }
        match tokio::fs::read(self.dir.join(name)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(name, e)),
        }
    }
}
