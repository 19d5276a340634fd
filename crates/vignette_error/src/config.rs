//! Configuration error types.

/// Configuration error surfaced before any work begins.
///
/// Covers invalid generation settings (zero pages, zero panels per page)
/// and provider selections that are missing a required credential.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// The underlying error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use vignette_error::ConfigError;
    ///
    /// let err = ConfigError::new("panels per page must be at least 1");
    /// assert!(format!("{}", err).contains("at least 1"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
