//! Media resolution: turn a [`MediaSource`] into raw image bytes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;
use vignette_core::MediaSource;
use vignette_error::{ExportError, ExportErrorKind, VignetteResult};

/// Resolve a media source into encoded image bytes.
///
/// URL sources are fetched with one GET; base64 sources are decoded;
/// binary sources are passed through.
pub async fn resolve_media(client: &reqwest::Client, source: &MediaSource) -> VignetteResult<Vec<u8>> {
    match source {
        MediaSource::Url(url) => {
            debug!(url = %url, "Fetching panel image for export");
            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| ExportError::new(ExportErrorKind::Fetch(e.to_string())))?;
            let status = response.status();
            if !status.is_success() {
                return Err(ExportError::new(ExportErrorKind::Fetch(format!(
                    "{url}: HTTP {status}"
                )))
                .into());
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ExportError::new(ExportErrorKind::Fetch(e.to_string())))?;
            Ok(bytes.to_vec())
        }
        MediaSource::Base64(data) => STANDARD
            .decode(data.trim())
            .map_err(|e| ExportError::new(ExportErrorKind::Fetch(format!("base64: {e}"))).into()),
        MediaSource::Binary(bytes) => Ok(bytes.clone()),
    }
}

/// File extension for encoded image bytes, probed from the magic number.
///
/// Unknown formats fall back to `bin` so archive exports still carry the
/// payload.
pub fn sniff_extension(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => "jpg",
        Ok(image::ImageFormat::Png) => "png",
        Ok(image::ImageFormat::WebP) => "webp",
        Ok(image::ImageFormat::Gif) => "gif",
        _ => "bin",
    }
}

/// MIME type for encoded image bytes, probed from the magic number.
pub(crate) fn sniff_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Gif) => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn sniffs_png_and_jpeg() {
        assert_eq!(sniff_extension(PNG_MAGIC), "png");
        assert_eq!(sniff_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), "jpg");
        assert_eq!(sniff_extension(b"not an image"), "bin");
    }

    #[tokio::test]
    async fn base64_source_decodes() {
        let client = reqwest::Client::new();
        let source = MediaSource::Base64("aGVsbG8=".to_string());
        let bytes = resolve_media(&client, &source).await.unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn binary_source_passes_through() {
        let client = reqwest::Client::new();
        let source = MediaSource::Binary(vec![1, 2, 3]);
        assert_eq!(resolve_media(&client, &source).await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn corrupt_base64_is_an_error() {
        let client = reqwest::Client::new();
        let source = MediaSource::Base64("not base64!!!".to_string());
        assert!(resolve_media(&client, &source).await.is_err());
    }
}
