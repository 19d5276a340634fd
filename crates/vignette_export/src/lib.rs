//! Export formats for generated comics.
//!
//! Each exporter consumes a slice of [`ExportPanel`] (resolved image bytes
//! plus an optional caption) and produces the finished artifact as bytes:
//!
//! - [`write_pdf`]: hand-assembled PDF 1.4, one comic page per PDF page,
//!   panels laid out in a grid with optional captions.
//! - [`write_zip`]: one image file per panel, caption sidecar files when
//!   enabled.
//! - [`write_cbz`]: image-only archive ordered for comic readers.
//! - [`write_epub`]: EPUB package with one XHTML page per panel.
//!
//! [`resolve_media`] turns a [`vignette_core::MediaSource`] into raw image
//! bytes, fetching URL sources and decoding inline base64.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod archive;
mod epub;
mod fetch;
mod pdf;

pub use archive::{write_cbz, write_zip};
pub use epub::write_epub;
pub use fetch::{resolve_media, sniff_extension};
pub use pdf::{PdfLayout, write_pdf};

/// One panel ready for export: resolved image bytes plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct ExportPanel {
    /// 1-based panel number across the whole comic
    pub number: usize,
    /// 0-based comic page this panel belongs to
    pub page: usize,
    /// Encoded image bytes (format probed at export time)
    pub image: Vec<u8>,
    /// Caption text shown beneath the panel, usually its dialogue
    pub caption: Option<String>,
}
