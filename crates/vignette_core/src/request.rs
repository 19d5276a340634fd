//! Image generation request type.

use serde::{Deserialize, Serialize};

/// A provider-agnostic image generation request.
///
/// # Examples
///
/// ```
/// use vignette_core::ImageRequest;
///
/// let request = ImageRequest::builder()
///     .prompt("a rooftop chase, comic book style".to_string())
///     .build()
///     .unwrap();
/// assert_eq!(request.width, 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(strip_option), default)]
pub struct ImageRequest {
    /// Prompt text describing the panel
    pub prompt: String,
    /// Requested image width in pixels
    pub width: u32,
    /// Requested image height in pixels
    pub height: u32,
    /// Provider-specific model identifier override
    pub model: Option<String>,
    /// Seed for reproducible generation, when the provider supports it
    pub seed: Option<u64>,
}

impl Default for ImageRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            width: 1024,
            height: 1024,
            model: None,
            seed: None,
        }
    }
}

impl ImageRequest {
    /// Start building a request.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}
