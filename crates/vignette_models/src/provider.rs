//! Provider selection.

use std::sync::Arc;
use tokio::sync::Mutex;
use vignette_error::{KeyError, KeyErrorKind, ProviderError, ProviderErrorKind, VignetteResult};
use vignette_keys::{KeyPool, RetryPolicy};

use crate::{GeminiClient, HuggingFaceClient, ImageDriver, PollinationsClient};

/// The image generation backends the studio can drive.
///
/// Parsed once from configuration; credential requirements are checked at
/// resolve time so a misconfigured provider fails before the first panel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ImageProvider {
    /// Keyless URL-parameterized synthesis.
    #[default]
    Pollinations,
    /// Keyed multimodal generation with pool rotation.
    Gemini,
    /// Keyed inference with the secondary credential.
    HuggingFace,
}

impl ImageProvider {
    /// Build the driver for this provider.
    ///
    /// Fails up front when the provider's credentials are missing: Gemini
    /// needs a non-empty primary pool, Hugging Face needs the secondary key.
    pub async fn resolve(
        self,
        pool: Arc<Mutex<KeyPool>>,
        secondary: Option<&str>,
        policy: RetryPolicy,
    ) -> VignetteResult<Box<dyn ImageDriver>> {
        match self {
            Self::Pollinations => Ok(Box::new(PollinationsClient::new()?)),
            Self::Gemini => {
                if pool.lock().await.is_empty() {
                    return Err(KeyError::new(KeyErrorKind::EmptyPool).into());
                }
                Ok(Box::new(GeminiClient::new(pool).with_policy(policy)))
            }
            Self::HuggingFace => {
                let key = secondary.ok_or_else(|| {
                    ProviderError::new(ProviderErrorKind::MissingApiKey(
                        "huggingface".to_string(),
                    ))
                })?;
                Ok(Box::new(HuggingFaceClient::new(key)))
            }
        }
    }
}
