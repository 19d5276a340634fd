//! Export error types.

/// Kinds of export errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExportErrorKind {
    /// PDF assembly failed
    #[display("PDF assembly failed: {}", _0)]
    Pdf(String),
    /// Archive (ZIP/CBZ) assembly failed
    #[display("Archive assembly failed: {}", _0)]
    Archive(String),
    /// EPUB package assembly failed
    #[display("EPUB assembly failed: {}", _0)]
    Epub(String),
    /// Panel image format could not be handled
    #[display("Unsupported panel image: {}", _0)]
    UnsupportedImage(String),
    /// Fetching a URL-sourced panel image failed
    #[display("Failed to fetch panel image: {}", _0)]
    Fetch(String),
    /// Nothing to export (no panel succeeded)
    #[display("No successful panels to export")]
    Empty,
}

/// Export error with location tracking.
///
/// # Examples
///
/// ```
/// use vignette_error::{ExportError, ExportErrorKind};
///
/// let err = ExportError::new(ExportErrorKind::Empty);
/// assert!(format!("{}", err).contains("No successful panels"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Export Error: {} at line {} in {}", kind, line, file)]
pub struct ExportError {
    /// The kind of error that occurred
    pub kind: ExportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ExportError {
    /// Create a new export error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
