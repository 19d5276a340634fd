//! Filesystem-backed key-value store.

use crate::KeyValueStore;
use std::path::PathBuf;
use vignette_error::{StorageError, StorageErrorKind, VignetteResult};

/// Filesystem storage backend.
///
/// Maps keys to files beneath a base directory and writes atomically via a
/// temp file + rename, so a crash mid-write never corrupts the stored
/// record.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if
    /// needed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> VignetteResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %base_path.display(), "Opened file store");
        Ok(Self { base_path })
    }

    /// Create a store at the platform data directory
    /// (e.g. `~/.local/share/vignette` on Linux).
    pub fn default_location() -> VignetteResult<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| {
                StorageError::new(StorageErrorKind::Unavailable(
                    "no platform data directory".to_string(),
                ))
            })?
            .join("vignette");
        Self::new(base)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys use forward slashes regardless of platform.
        key.split('/')
            .fold(self.base_path.clone(), |path, part| path.join(part))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    #[tracing::instrument(skip(self))]
    async fn load(&self, key: &str) -> VignetteResult<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self, value), fields(len = value.len()))]
    async fn store(&self, key: &str, value: &str) -> VignetteResult<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity.
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, value).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;
        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove(&self, key: &str) -> VignetteResult<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }
}
