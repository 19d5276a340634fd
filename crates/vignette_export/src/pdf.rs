//! Hand-assembled PDF 1.4 output.
//!
//! One comic page per PDF page, panels laid out in a near-square grid.
//! JPEG panels are embedded directly as DCTDecode XObjects; anything else
//! is transcoded to JPEG first. Captions render in built-in Helvetica, so
//! no font embedding is needed. Content streams are Flate-compressed.

use flate2::Compression;
use flate2::write::ZlibEncoder;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use tracing::debug;
use vignette_error::{ExportError, ExportErrorKind, VignetteResult};

use crate::ExportPanel;

const CAPTION_BAND: f32 = 24.0;
const CAPTION_FONT_SIZE: f32 = 9.0;

/// Page geometry and layout options for [`write_pdf`].
#[derive(Debug, Clone)]
pub struct PdfLayout {
    /// Panels laid out on each comic page
    pub panels_per_page: usize,
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Outer margin in points
    pub margin: f32,
    /// Space between panel cells in points
    pub gutter: f32,
    /// Render captions beneath panels
    pub captions: bool,
}

impl Default for PdfLayout {
    fn default() -> Self {
        // US Letter
        Self {
            panels_per_page: 4,
            page_width: 612.0,
            page_height: 792.0,
            margin: 36.0,
            gutter: 12.0,
            captions: true,
        }
    }
}

impl PdfLayout {
    fn grid(&self) -> (usize, usize) {
        let n = self.panels_per_page.max(1);
        let cols = (n as f32).sqrt().ceil() as usize;
        let rows = n.div_ceil(cols);
        (cols, rows)
    }
}

fn pdf_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::new(ExportErrorKind::Pdf(e.to_string()))
}

/// Assemble a PDF from the exported panels.
///
/// Panels are grouped by their comic page; each group becomes one PDF page
/// with panels placed left to right, top to bottom by panel number.
///
/// # Errors
///
/// [`ExportErrorKind::Empty`] when `panels` is empty;
/// [`ExportErrorKind::UnsupportedImage`] when panel bytes cannot be decoded.
pub fn write_pdf(panels: &[ExportPanel], layout: &PdfLayout) -> VignetteResult<Vec<u8>> {
    if panels.is_empty() {
        return Err(ExportError::new(ExportErrorKind::Empty).into());
    }

    // Group by comic page, keeping panel order within each page.
    let mut pages: BTreeMap<usize, Vec<&ExportPanel>> = BTreeMap::new();
    for panel in panels {
        pages.entry(panel.page).or_default().push(panel);
    }

    // Normalize every panel to JPEG with known dimensions up front.
    let mut images = Vec::with_capacity(panels.len());
    for panel in panels {
        images.push(prepare_jpeg(&panel.image)?);
    }

    let total_panels = panels.len();
    let catalog_id = 1;
    let pages_id = 2;
    let font_id = 3;
    let first_image_id = 4;
    // Image ids are assigned in `panels` order; page and content objects
    // follow the image block.
    let image_id = |panel_index: usize| first_image_id + panel_index;
    let first_page_id = first_image_id + total_panels;
    let page_id = |page_index: usize| first_page_id + 2 * page_index;
    let content_id = |page_index: usize| first_page_id + 2 * page_index + 1;
    let total_objects = first_page_id + 2 * pages.len() - 1;

    let mut builder = PdfBuilder::new(total_objects);

    builder.object(
        catalog_id,
        format!("<< /Type /Catalog /Pages {pages_id} 0 R >>").as_bytes(),
        None,
    );

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", page_id(i)))
        .collect();
    builder.object(
        pages_id,
        format!(
            "<< /Type /Pages /Count {} /Kids [{}] >>",
            pages.len(),
            kids.join(" ")
        )
        .as_bytes(),
        None,
    );

    builder.object(
        font_id,
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>",
        None,
    );

    // Panel index within the flat `panels` slice, keyed by panel number.
    let flat_index: BTreeMap<usize, usize> = panels
        .iter()
        .enumerate()
        .map(|(i, p)| (p.number, i))
        .collect();

    for (i, (jpeg, width, height)) in images.iter().enumerate() {
        let dict = format!(
            "<< /Type /XObject /Subtype /Image /Width {width} /Height {height} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /DCTDecode \
             /Length {} >>",
            jpeg.len()
        );
        builder.object(image_id(i), dict.as_bytes(), Some(jpeg));
    }

    for (page_index, (_, page_panels)) in pages.iter().enumerate() {
        let mut ops = String::new();
        for (slot, panel) in page_panels.iter().enumerate() {
            let i = flat_index[&panel.number];
            let (_, width, height) = images[i];
            let cell = cell_rect(layout, slot);
            let caption = layout.captions.then(|| panel.caption.as_deref()).flatten();
            let image_area_height = if caption.is_some() {
                cell.3 - CAPTION_BAND
            } else {
                cell.3
            };
            let (w, h) = fit(width as f32, height as f32, cell.2, image_area_height);
            let x = cell.0 + (cell.2 - w) / 2.0;
            let y = cell.1 + cell.3 - h;
            ops.push_str(&format!(
                "q {w:.2} 0 0 {h:.2} {x:.2} {y:.2} cm /Im{i} Do Q\n"
            ));
            if let Some(text) = caption {
                ops.push_str(&format!(
                    "BT /F1 {CAPTION_FONT_SIZE} Tf {:.2} {:.2} Td ({}) Tj ET\n",
                    cell.0,
                    cell.1 + CAPTION_BAND - CAPTION_FONT_SIZE - 2.0,
                    pdf_escape(text),
                ));
            }
        }

        let compressed = deflate(ops.as_bytes())?;
        builder.object(
            content_id(page_index),
            format!(
                "<< /Length {} /Filter /FlateDecode >>",
                compressed.len()
            )
            .as_bytes(),
            Some(&compressed),
        );

        let xobjects: Vec<String> = page_panels
            .iter()
            .map(|p| {
                let i = flat_index[&p.number];
                format!("/Im{i} {} 0 R", image_id(i))
            })
            .collect();
        builder.object(
            page_id(page_index),
            format!(
                "<< /Type /Page /Parent {pages_id} 0 R \
                 /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /XObject << {} >> /Font << /F1 {font_id} 0 R >> >> \
                 /Contents {} 0 R >>",
                layout.page_width,
                layout.page_height,
                xobjects.join(" "),
                content_id(page_index),
            )
            .as_bytes(),
            None,
        );
    }

    let bytes = builder.finish(catalog_id);
    debug!(
        panels = total_panels,
        pages = pages.len(),
        bytes = bytes.len(),
        "Assembled PDF"
    );
    Ok(bytes)
}

/// Cell rectangle `(x, y, width, height)` for a slot, origin bottom-left.
fn cell_rect(layout: &PdfLayout, slot: usize) -> (f32, f32, f32, f32) {
    let (cols, rows) = layout.grid();
    let col = slot % cols;
    let row = slot / cols;
    let usable_w = layout.page_width - 2.0 * layout.margin - layout.gutter * (cols as f32 - 1.0);
    let usable_h = layout.page_height - 2.0 * layout.margin - layout.gutter * (rows as f32 - 1.0);
    let cell_w = usable_w / cols as f32;
    let cell_h = usable_h / rows as f32;
    let x = layout.margin + col as f32 * (cell_w + layout.gutter);
    // Row 0 is the top row; PDF origin is bottom-left.
    let y = layout.page_height - layout.margin - cell_h - row as f32 * (cell_h + layout.gutter);
    (x, y, cell_w, cell_h)
}

/// Scale `(w, h)` to fit inside `(max_w, max_h)` preserving aspect ratio.
fn fit(w: f32, h: f32, max_w: f32, max_h: f32) -> (f32, f32) {
    if w <= 0.0 || h <= 0.0 {
        return (max_w, max_h);
    }
    let scale = (max_w / w).min(max_h / h);
    (w * scale, h * scale)
}

/// Normalize panel bytes to JPEG, returning `(jpeg, width, height)`.
fn prepare_jpeg(bytes: &[u8]) -> VignetteResult<(Vec<u8>, u32, u32)> {
    let format = image::guess_format(bytes)
        .map_err(|e| ExportError::new(ExportErrorKind::UnsupportedImage(e.to_string())))?;

    if format == image::ImageFormat::Jpeg {
        let (width, height) = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| ExportError::new(ExportErrorKind::UnsupportedImage(e.to_string())))?
            .into_dimensions()
            .map_err(|e| ExportError::new(ExportErrorKind::UnsupportedImage(e.to_string())))?;
        return Ok((bytes.to_vec(), width, height));
    }

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| ExportError::new(ExportErrorKind::UnsupportedImage(e.to_string())))?;
    let (width, height) = (decoded.width(), decoded.height());
    let mut cursor = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(decoded.to_rgb8())
        .write_to(&mut cursor, image::ImageFormat::Jpeg)
        .map_err(|e| ExportError::new(ExportErrorKind::UnsupportedImage(e.to_string())))?;
    Ok((cursor.into_inner(), width, height))
}

fn deflate(bytes: &[u8]) -> VignetteResult<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).map_err(pdf_err)?;
    encoder.finish().map_err(|e| pdf_err(e).into())
}

/// Escape a caption for a PDF literal string.
fn pdf_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => escaped.push_str("\\("),
            ')' => escaped.push_str("\\)"),
            '\\' => escaped.push_str("\\\\"),
            '\n' | '\r' => escaped.push(' '),
            c if c.is_ascii() => escaped.push(c),
            // Helvetica with the default encoding cannot show these anyway.
            _ => escaped.push('?'),
        }
    }
    escaped
}

/// Low-level PDF object writer tracking byte offsets for the xref table.
struct PdfBuilder {
    out: Vec<u8>,
    offsets: Vec<u64>,
}

impl PdfBuilder {
    fn new(total_objects: usize) -> Self {
        let mut out = Vec::new();
        out.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker comment so transports treat the file as binary.
        out.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
        Self {
            out,
            offsets: vec![0; total_objects],
        }
    }

    fn object(&mut self, id: usize, dict: &[u8], stream: Option<&[u8]>) {
        self.offsets[id - 1] = self.out.len() as u64;
        self.out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
        self.out.extend_from_slice(dict);
        if let Some(data) = stream {
            self.out.extend_from_slice(b"\nstream\n");
            self.out.extend_from_slice(data);
            self.out.extend_from_slice(b"\nendstream");
        }
        self.out.extend_from_slice(b"\nendobj\n");
    }

    fn finish(mut self, catalog_id: usize) -> Vec<u8> {
        let xref_offset = self.out.len();
        let count = self.offsets.len() + 1;
        self.out
            .extend_from_slice(format!("xref\n0 {count}\n").as_bytes());
        self.out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.out
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.out.extend_from_slice(
            format!(
                "trailer\n<< /Size {count} /Root {catalog_id} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
            )
            .as_bytes(),
        );
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_png() -> Vec<u8> {
        // 2x1 white PNG generated through the image crate.
        let img = image::RgbImage::from_pixel(2, 1, image::Rgb([255, 255, 255]));
        let mut cursor = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, image::ImageFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    fn sample_panels() -> Vec<ExportPanel> {
        vec![
            ExportPanel::new(1, 0, tiny_png(), Some("NOVA: (whisper) go".to_string())),
            ExportPanel::new(2, 0, tiny_png(), None),
            ExportPanel::new(3, 1, tiny_png(), None),
        ]
    }

    #[test]
    fn header_and_trailer_present() {
        let bytes = write_pdf(&sample_panels(), &PdfLayout::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        let rendered = String::from_utf8_lossy(&bytes);
        assert!(rendered.contains("/Type /Catalog"));
        assert!(rendered.contains("/Count 2"));
    }

    #[test]
    fn png_panels_are_transcoded_to_jpeg_xobjects() {
        let bytes = write_pdf(&sample_panels(), &PdfLayout::default()).unwrap();
        let rendered = String::from_utf8_lossy(&bytes);
        assert!(rendered.contains("/Filter /DCTDecode"));
    }

    #[test]
    fn captions_escape_parentheses() {
        let bytes = write_pdf(&sample_panels(), &PdfLayout::default()).unwrap();
        // Caption text lives in a compressed stream; check only that the
        // escape helper behaves.
        assert_eq!(pdf_escape("a (b) \\c"), "a \\(b\\) \\\\c");
        assert!(!bytes.is_empty());
    }

    #[test]
    fn grid_is_near_square() {
        let layout = PdfLayout {
            panels_per_page: 6,
            ..PdfLayout::default()
        };
        assert_eq!(layout.grid(), (3, 2));
    }

    #[test]
    fn fit_preserves_aspect_ratio() {
        let (w, h) = fit(200.0, 100.0, 50.0, 50.0);
        assert!((w - 50.0).abs() < 0.001);
        assert!((h - 25.0).abs() < 0.001);
    }

    #[test]
    fn empty_batch_is_an_error() {
        assert!(write_pdf(&[], &PdfLayout::default()).is_err());
    }
}
