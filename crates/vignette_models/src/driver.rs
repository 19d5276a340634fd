//! Trait definitions for generation providers.

use async_trait::async_trait;
use vignette_core::{ImageRequest, PanelArt};
use vignette_error::VignetteResult;

/// Core trait for providers that render panel illustrations.
#[async_trait]
pub trait ImageDriver: Send + Sync {
    /// Generate one panel image for the request.
    ///
    /// On success the returned art carries the exact prompt used alongside
    /// the image reference (URL, inline base64, or raw bytes).
    async fn generate_image(&self, req: &ImageRequest) -> VignetteResult<PanelArt>;

    /// Provider name (e.g. "pollinations", "gemini", "huggingface").
    fn provider_name(&self) -> &'static str;
}

/// Trait for providers that can rewrite prose into screenplay form.
#[async_trait]
pub trait ScriptDriver: Send + Sync {
    /// Rewrite a free-text story as a screenplay-formatted script.
    async fn rewrite_script(&self, story: &str) -> VignetteResult<String>;

    /// Provider name.
    fn provider_name(&self) -> &'static str;
}
