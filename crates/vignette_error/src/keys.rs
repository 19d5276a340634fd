//! Credential pool and retry exhaustion error types.

/// Kinds of credential errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum KeyErrorKind {
    /// The credential pool contains no keys
    #[display("Credential pool is empty; add at least one API key")]
    EmptyPool,
    /// Every retry attempt failed
    #[display("All {} attempts failed; last error: {}", attempts, last_error)]
    Exhausted {
        /// Total number of operation invocations before giving up
        attempts: usize,
        /// Message of the final underlying failure
        last_error: String,
    },
}

/// Credential error with location tracking.
///
/// # Examples
///
/// ```
/// use vignette_error::{KeyError, KeyErrorKind};
///
/// let err = KeyError::new(KeyErrorKind::EmptyPool);
/// assert!(format!("{}", err).contains("empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Key Error: {} at line {} in {}", kind, line, file)]
pub struct KeyError {
    /// The kind of error that occurred
    pub kind: KeyErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl KeyError {
    /// Create a new key error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: KeyErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
