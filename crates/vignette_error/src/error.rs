//! Top-level error wrapper types.

use crate::{
    ConfigError, ExportError, JsonError, KeyError, ProviderError, RateLimited, StorageError,
};

/// This is the foundation error enum. Each vignette crate contributes the
/// variant covering its own failure domain.
///
/// # Examples
///
/// ```
/// use vignette_error::{VignetteError, ConfigError};
///
/// let config_err = ConfigError::new("page count must be at least 1");
/// let err: VignetteError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VignetteErrorKind {
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Credential pool or retry exhaustion error
    #[from(KeyError)]
    Key(KeyError),
    /// Generation provider error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Export error
    #[from(ExportError)]
    Export(ExportError),
}

/// Vignette error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vignette_error::{VignetteResult, ConfigError};
///
/// fn might_fail() -> VignetteResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Vignette Error: {}", _0)]
pub struct VignetteError(Box<VignetteErrorKind>);

impl VignetteError {
    /// Create a new error from a kind.
    pub fn new(kind: VignetteErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VignetteErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VignetteErrorKind
impl<T> From<T> for VignetteError
where
    T: Into<VignetteErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RateLimited for VignetteError {
    fn is_rate_limit(&self) -> bool {
        match self.kind() {
            VignetteErrorKind::Provider(e) => e.is_rate_limit(),
            _ => false,
        }
    }
}

/// Result type for Vignette operations.
///
/// # Examples
///
/// ```
/// use vignette_error::{VignetteResult, StorageError, StorageErrorKind};
///
/// fn read_record() -> VignetteResult<String> {
///     Err(StorageError::new(StorageErrorKind::FileRead(
///         "credentials.json: permission denied".to_string(),
///     )))?
/// }
/// ```
pub type VignetteResult<T> = std::result::Result<T, VignetteError>;
