//! Ordered credential pool with a rotating cursor.

use vignette_error::{KeyError, KeyErrorKind, VignetteResult};

/// An ordered pool of interchangeable secret credentials.
///
/// The cursor advances by one (modulo pool size) on every key handout,
/// regardless of whether the eventual call succeeds, so consecutive
/// operations keep rotating instead of always starting at key 0. Replacing
/// the pool resets the cursor to 0.
///
/// The `Debug` impl never prints key material.
///
/// # Examples
///
/// ```
/// use vignette_keys::KeyPool;
///
/// let mut pool = KeyPool::new(vec!["a".to_string(), "b".to_string()]);
/// assert_eq!(pool.next_key().unwrap(), "a");
/// assert_eq!(pool.next_key().unwrap(), "b");
/// assert_eq!(pool.next_key().unwrap(), "a");
/// ```
#[derive(Clone, Default)]
pub struct KeyPool {
    keys: Vec<String>,
    cursor: usize,
}

impl std::fmt::Debug for KeyPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPool")
            .field("len", &self.keys.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl KeyPool {
    /// Create a pool from an ordered list of keys.
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys, cursor: 0 }
    }

    /// Number of keys in the pool.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check whether the pool holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Hand out the key at the cursor and advance the cursor by one, modulo
    /// pool size.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pool is empty.
    pub fn next_key(&mut self) -> VignetteResult<String> {
        if self.keys.is_empty() {
            return Err(KeyError::new(KeyErrorKind::EmptyPool).into());
        }
        let key = self.keys[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.keys.len();
        Ok(key)
    }

    /// Append a key to the end of the pool. The cursor is unchanged.
    pub fn push(&mut self, key: impl Into<String>) {
        self.keys.push(key.into());
    }

    /// Remove every occurrence of `key`. Returns true if anything was
    /// removed. The cursor is clamped back into range.
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k != key);
        if self.keys.is_empty() {
            self.cursor = 0;
        } else {
            self.cursor %= self.keys.len();
        }
        self.keys.len() != before
    }

    /// Replace the entire pool, resetting the cursor to 0.
    pub fn replace(&mut self, keys: Vec<String>) {
        self.keys = keys;
        self.cursor = 0;
    }

    /// The keys in rotation order. Callers are responsible for not logging
    /// these.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}
