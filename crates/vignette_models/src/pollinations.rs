//! Pollinations image synthesis client.
//!
//! Pollinations is keyless: the prompt and parameters are carried entirely
//! in the request URL, and the response body is the image itself.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, instrument};
use vignette_core::{ImageRequest, MediaSource, PanelArt};
use vignette_error::{ProviderError, ProviderErrorKind, VignetteResult};

use crate::ImageDriver;

const BASE_URL: &str = "https://image.pollinations.ai";

/// Client for the Pollinations image endpoint.
#[derive(Debug, Clone)]
pub struct PollinationsClient {
    client: Client,
    base_url: Url,
}

impl PollinationsClient {
    /// Create a new client against the public endpoint.
    pub fn new() -> VignetteResult<Self> {
        Self::with_base_url(BASE_URL)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_base_url(base_url: &str) -> VignetteResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProviderError::new(ProviderErrorKind::Request(format!("{base_url}: {e}"))))?;
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn build_url(&self, req: &ImageRequest) -> VignetteResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::new(ProviderErrorKind::Request("base URL cannot be a base".to_string())))?
            .push("prompt")
            .push(&req.prompt);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("width", &req.width.to_string())
                .append_pair("height", &req.height.to_string())
                .append_pair("nologo", "true");
            if let Some(seed) = req.seed {
                query.append_pair("seed", &seed.to_string());
            }
            if let Some(model) = &req.model {
                query.append_pair("model", model);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl ImageDriver for PollinationsClient {
    #[instrument(skip(self, req), fields(prompt_len = req.prompt.len()))]
    async fn generate_image(&self, req: &ImageRequest) -> VignetteResult<PanelArt> {
        let url = self.build_url(req)?;
        debug!(url = %url, "Requesting Pollinations image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message,
            })
            .into());
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Decode(e.to_string())))?;
        if bytes.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyResponse).into());
        }

        Ok(PanelArt::new(
            req.prompt.clone(),
            MediaSource::Binary(bytes.to_vec()),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "pollinations"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_prompt_and_parameters() {
        let client = PollinationsClient::new().unwrap();
        let req = ImageRequest::builder()
            .prompt("a dark alley & rain".to_string())
            .seed(7u64)
            .build()
            .unwrap();
        let url = client.build_url(&req).unwrap();
        let rendered = url.to_string();
        assert!(rendered.starts_with("https://image.pollinations.ai/prompt/"));
        assert!(!rendered.contains(" & "));
        assert!(rendered.contains("width=1024"));
        assert!(rendered.contains("seed=7"));
        assert!(rendered.contains("nologo=true"));
    }
}
