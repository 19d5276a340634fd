//! Google Gemini API client.
//!
//! Image generation uses the streaming endpoint (`alt=sse`): the response
//! arrives as a sequence of multi-part chunks whose parts carry either text
//! or inline base64 image payloads. Text generation (script rewriting) uses
//! the plain endpoint.
//!
//! Every call rotates through the primary key pool via
//! [`vignette_keys::retry_with_rotation`], so rate-limited keys are cycled
//! out with exponential backoff instead of failing the panel outright.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use vignette_core::{ImageRequest, MediaSource, PanelArt};
use vignette_error::{ProviderError, ProviderErrorKind, VignetteResult};
use vignette_keys::{KeyPool, RetryPolicy, retry_with_rotation};

use crate::{ImageDriver, ScriptDriver};

const BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_IMAGE_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
const DEFAULT_TEXT_MODEL: &str = "gemini-2.0-flash";

const REWRITE_INSTRUCTION: &str = "Rewrite the following story as a short screenplay. \
Use INT. or EXT. scene headings, ALL-CAPS character cues above dialogue lines, \
and blank lines between blocks. Keep it faithful to the story; do not add commentary.";

//
// ─── WIRE TYPES ─────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        rename = "inlineData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

//
// ─── CLIENT ─────────────────────────────────────────────────────────────────────
//

/// Client for the Gemini generative API.
pub struct GeminiClient {
    client: Client,
    pool: Arc<Mutex<KeyPool>>,
    policy: RetryPolicy,
    base_url: String,
    image_model: String,
    text_model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("image_model", &self.image_model)
            .field("text_model", &self.text_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client rotating through the given key pool with the default
    /// retry policy and models.
    pub fn new(pool: Arc<Mutex<KeyPool>>) -> Self {
        Self {
            client: Client::new(),
            pool,
            policy: RetryPolicy::default(),
            base_url: BASE_URL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
        }
    }

    /// Override the endpoint base URL (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Override the image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    fn endpoint(&self, model: &str, method: &str, sse: bool) -> String {
        let suffix = if sse { "?alt=sse" } else { "" };
        format!(
            "{}/v1beta/models/{}:{}{}",
            self.base_url, model, method, suffix
        )
    }

    /// One streamed image generation attempt with a single key.
    async fn stream_image_once(
        &self,
        key: &str,
        prompt: &str,
    ) -> Result<PanelArt, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            }),
        };

        let url = self.endpoint(&self.image_model, "streamGenerateContent", true);
        debug!(model = %self.image_model, "Sending Gemini image request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        // Drain the SSE stream into a buffer; the image arrives as inline
        // base64 split across multi-part chunks, so nothing is usable until
        // the stream completes anyway.
        let mut buffer = String::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| ProviderError::new(ProviderErrorKind::Request(e.to_string())))?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));
        }

        extract_inline_image(&buffer)
            .map(|(mime, data)| {
                debug!(mime = %mime, "Extracted inline image payload");
                PanelArt::new(prompt.to_string(), MediaSource::Base64(data))
            })
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))
    }

    /// One text generation attempt with a single key.
    async fn generate_text_once(&self, key: &str, prompt: &str) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    inline_data: None,
                }],
            }],
            generation_config: None,
        };

        let url = self.endpoint(&self.text_model, "generateContent", false);
        debug!(model = %self.text_model, "Sending Gemini text request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Request(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::new(ProviderErrorKind::Decode(e.to_string())))?;

        let text = collect_text(&parsed);
        if text.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyResponse));
        }
        Ok(text)
    }
}

#[async_trait]
impl ImageDriver for GeminiClient {
    #[instrument(skip(self, req), fields(prompt_len = req.prompt.len()))]
    async fn generate_image(&self, req: &ImageRequest) -> VignetteResult<PanelArt> {
        let mut pool = self.pool.lock().await;
        retry_with_rotation(&mut pool, &self.policy, |key| {
            let prompt = req.prompt.clone();
            async move { self.stream_image_once(&key, &prompt).await }
        })
        .await
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

#[async_trait]
impl ScriptDriver for GeminiClient {
    #[instrument(skip(self, story), fields(story_len = story.len()))]
    async fn rewrite_script(&self, story: &str) -> VignetteResult<String> {
        let prompt = format!("{REWRITE_INSTRUCTION}\n\n{story}");
        let mut pool = self.pool.lock().await;
        retry_with_rotation(&mut pool, &self.policy, |key| {
            let prompt = prompt.clone();
            async move { self.generate_text_once(&key, &prompt).await }
        })
        .await
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

//
// ─── RESPONSE PARSING ───────────────────────────────────────────────────────────
//

/// Pull the first inline image payload out of a buffered SSE body.
///
/// Returns `(mime_type, base64_data)`.
fn extract_inline_image(sse_body: &str) -> Option<(String, String)> {
    for event in parse_sse_events(sse_body) {
        let Ok(chunk) = serde_json::from_str::<GenerateContentResponse>(&event) else {
            continue;
        };
        for candidate in chunk.candidates {
            let Some(content) = candidate.content else {
                continue;
            };
            for part in content.parts {
                if let Some(inline) = part.inline_data {
                    return Some((inline.mime_type, inline.data));
                }
            }
        }
    }
    None
}

/// Extract the data payloads from an SSE body.
fn parse_sse_events(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .filter(|data| !data.is_empty() && *data != "[DONE]")
        .map(str::to_string)
        .collect()
}

/// Join the text parts of a response in order.
fn collect_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|content| content.parts.iter())
        .filter_map(|part| part.text.as_deref())
        .collect::<Vec<_>>()
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sse_events_skip_blank_and_done() {
        let body = "data: {\"a\":1}\n\ndata: [DONE]\n\ndata: {\"b\":2}\n";
        let events = parse_sse_events(body);
        assert_eq!(events, vec!["{\"a\":1}", "{\"b\":2}"]);
    }

    #[test]
    fn inline_image_found_across_chunks() {
        let body = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"drawing\"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[",
            "{\"inlineData\":{\"mimeType\":\"image/png\",\"data\":\"aGVsbG8=\"}}]}}]}\n\n",
        );
        let (mime, data) = extract_inline_image(body).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(data, "aGVsbG8=");
    }

    #[test]
    fn text_parts_join_in_order() {
        let response: GenerateContentResponse = serde_json::from_str(
            "{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"FADE \"},{\"text\":\"IN:\"}]}}]}",
        )
        .unwrap();
        assert_eq!(collect_text(&response), "FADE IN:");
    }
}
