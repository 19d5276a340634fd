//! Hugging Face inference API client.
//!
//! The inference endpoint takes a single JSON `inputs` field and answers
//! with raw image bytes. It authenticates with one bearer token (the
//! secondary credential), so there is no pool rotation here.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};
use vignette_core::{ImageRequest, MediaSource, PanelArt};
use vignette_error::{ProviderError, ProviderErrorKind, VignetteResult};

use crate::ImageDriver;

const BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODEL: &str = "stabilityai/stable-diffusion-xl-base-1.0";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Client for Hugging Face hosted inference.
#[derive(Clone)]
pub struct HuggingFaceClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for HuggingFaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceClient {
    /// Create a client with the given bearer token and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Override the endpoint base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}", self.base_url, model)
    }
}

#[async_trait]
impl ImageDriver for HuggingFaceClient {
    #[instrument(skip(self, req), fields(prompt_len = req.prompt.len()))]
    async fn generate_image(&self, req: &ImageRequest) -> VignetteResult<PanelArt> {
        let model = req.model.as_deref().unwrap_or(&self.model);
        let url = self.endpoint(model);
        debug!(model = %model, "Requesting Hugging Face inference");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&InferenceRequest { inputs: &req.prompt })
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
        "huggingface"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_override_changes_endpoint() {
        let client = HuggingFaceClient::new("hf_test");
        assert_eq!(
            client.endpoint("runwayml/stable-diffusion-v1-5"),
            "https://api-inference.huggingface.co/models/runwayml/stable-diffusion-v1-5"
        );
    }

    #[test]
    fn debug_never_prints_token() {
        let client = HuggingFaceClient::new("hf_secret_token");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("hf_secret_token"));
    }
}
