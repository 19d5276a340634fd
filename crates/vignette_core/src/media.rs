//! Media source types for generated panel images.

use serde::{Deserialize, Serialize};

/// Where a generated image is sourced from.
///
/// # Examples
///
/// ```
/// use vignette_core::MediaSource;
///
/// let url = MediaSource::Url("https://example.com/panel.png".to_string());
/// let base64 = MediaSource::Base64("iVBORw0KGgo...".to_string());
/// let binary = MediaSource::Binary(vec![0x89, 0x50, 0x4E, 0x47]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSource {
    /// URL to fetch the content from
    Url(String),
    /// Base64-encoded content
    Base64(String),
    /// Raw binary data
    Binary(Vec<u8>),
}
