//! Storage trait definition.

use vignette_error::VignetteResult;

/// Trait for pluggable key-value storage backends.
///
/// Values are opaque serialized strings; callers own the serialization
/// format. Keys use `/`-separated segments (e.g. `vignette/credentials.json`)
/// which filesystem backends map to paths.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored under the key; errors are
    /// reserved for backend failures.
    async fn load(&self, key: &str) -> VignetteResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn store(&self, key: &str, value: &str) -> VignetteResult<()>;

    /// Remove the value stored under `key`, if present.
    async fn remove(&self, key: &str) -> VignetteResult<()>;
}
