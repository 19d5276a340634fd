//! Persisted credential store.

use crate::KeyPool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use vignette_error::{JsonError, VignetteResult};
use vignette_storage::KeyValueStore;

/// The single well-known storage key holding the credential record.
pub const CREDENTIALS_KEY: &str = "vignette/credentials.json";

/// Serialized form of the credential record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CredentialRecord {
    /// Primary provider key pool, in rotation order
    #[serde(default)]
    keys: Vec<String>,
    /// At most one key for the secondary provider
    #[serde(default)]
    secondary: Option<String>,
}

/// Owns the credential pools and mirrors every mutation to durable storage.
///
/// The record is read once at construction and written on every update; the
/// storage backend is injected so tests can substitute
/// [`vignette_storage::MemoryStore`]. The primary pool is shared out as an
/// `Arc<Mutex<KeyPool>>` handle so provider clients rotate through the same
/// cursor the store owns. Secrets never appear in `Debug` output or logs.
pub struct KeyStore {
    storage: Arc<dyn KeyValueStore>,
    pool: Arc<Mutex<KeyPool>>,
    secondary: Option<String>,
}

impl std::fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyStore")
            .field("has_secondary", &self.secondary.is_some())
            .finish_non_exhaustive()
    }
}

impl KeyStore {
    /// Open the store, loading any previously persisted record.
    ///
    /// A corrupt record is logged and treated as empty rather than blocking
    /// startup; the next successful update overwrites it.
    #[tracing::instrument(skip(storage))]
    pub async fn open(storage: Arc<dyn KeyValueStore>) -> VignetteResult<Self> {
        let record = match storage.load(CREDENTIALS_KEY).await? {
            Some(raw) => match serde_json::from_str::<CredentialRecord>(&raw) {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "Stored credential record is corrupt; starting empty");
                    CredentialRecord::default()
                }
            },
            None => CredentialRecord::default(),
        };

        debug!(
            keys = record.keys.len(),
            has_secondary = record.secondary.is_some(),
            "Loaded credential record"
        );

        Ok(Self {
            storage,
            pool: Arc::new(Mutex::new(KeyPool::new(record.keys))),
            secondary: record.secondary,
        })
    }

    /// Shared handle to the primary key pool and its rotation cursor.
    pub fn pool_handle(&self) -> Arc<Mutex<KeyPool>> {
        Arc::clone(&self.pool)
    }

    /// Number of keys in the primary pool.
    pub async fn key_count(&self) -> usize {
        self.pool.lock().await.len()
    }

    /// Masked forms of the primary keys, safe for display: `abcd…wxyz`.
    pub async fn masked_keys(&self) -> Vec<String> {
        self.pool.lock().await.keys().iter().map(|k| mask(k)).collect()
    }

    /// The secondary-provider key, if configured.
    pub fn secondary(&self) -> Option<&str> {
        self.secondary.as_deref()
    }

    /// Append a key to the primary pool and persist.
    pub async fn add_key(&mut self, key: impl Into<String>) -> VignetteResult<()> {
        self.pool.lock().await.push(key);
        self.persist().await
    }

    /// Remove a key from the primary pool and persist. Returns true if the
    /// key was present.
    pub async fn remove_key(&mut self, key: &str) -> VignetteResult<bool> {
        let removed = self.pool.lock().await.remove(key);
        if removed {
            self.persist().await?;
        }
        Ok(removed)
    }

    /// Replace the primary pool and persist. The rotation cursor resets
    /// to 0.
    pub async fn set_keys(&mut self, keys: Vec<String>) -> VignetteResult<()> {
        self.pool.lock().await.replace(keys);
        self.persist().await
    }

    /// Set or clear the secondary-provider key and persist.
    pub async fn set_secondary(&mut self, key: Option<String>) -> VignetteResult<()> {
        self.secondary = key;
        self.persist().await
    }

    async fn persist(&self) -> VignetteResult<()> {
        let record = CredentialRecord {
            keys: self.pool.lock().await.keys().to_vec(),
            secondary: self.secondary.clone(),
        };
        let raw = serde_json::to_string(&record)
            .map_err(|e| JsonError::new(format!("credential record: {e}")))?;
        self.storage.store(CREDENTIALS_KEY, &raw).await
    }
}

fn mask(key: &str) -> String {
    match (key.get(..4), key.get(key.len().saturating_sub(4)..)) {
        (Some(head), Some(tail)) if key.len() > 8 => format!("{head}…{tail}"),
        _ => "…".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_hides_middle() {
        assert_eq!(mask("sk-abcdef123456"), "sk-a…3456");
        assert_eq!(mask("short"), "…");
    }
}
