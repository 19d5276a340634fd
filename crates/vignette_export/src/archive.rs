//! ZIP and CBZ assembly.

use std::io::{Cursor, Write};
use tracing::debug;
use vignette_error::{ExportError, ExportErrorKind, VignetteResult};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::ExportPanel;
use crate::fetch::sniff_extension;

fn archive_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::new(ExportErrorKind::Archive(e.to_string()))
}

/// Assemble a ZIP archive with one image per panel.
///
/// Panels are named `panel_001.jpg` (extension probed from the bytes) in
/// comic order. When `captions` is set, panels with caption text get a
/// sibling `panel_001.txt`.
///
/// # Errors
///
/// [`ExportErrorKind::Empty`] when `panels` is empty.
pub fn write_zip(panels: &[ExportPanel], captions: bool) -> VignetteResult<Vec<u8>> {
    write_archive(panels, captions)
}

/// Assemble a CBZ archive: images only, named so comic readers page
/// through them in order.
///
/// # Errors
///
/// [`ExportErrorKind::Empty`] when `panels` is empty.
pub fn write_cbz(panels: &[ExportPanel]) -> VignetteResult<Vec<u8>> {
    write_archive(panels, false)
}

fn write_archive(panels: &[ExportPanel], captions: bool) -> VignetteResult<Vec<u8>> {
    if panels.is_empty() {
        return Err(ExportError::new(ExportErrorKind::Empty).into());
    }

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for panel in panels {
        let ext = sniff_extension(&panel.image);
        let name = format!("panel_{:03}.{}", panel.number, ext);
        writer.start_file(&name, options).map_err(archive_err)?;
        writer.write_all(&panel.image).map_err(archive_err)?;

        if captions {
            if let Some(text) = &panel.caption {
                let caption_name = format!("panel_{:03}.txt", panel.number);
                writer
                    .start_file(&caption_name, options)
                    .map_err(archive_err)?;
                writer.write_all(text.as_bytes()).map_err(archive_err)?;
            }
        }
    }

    let cursor = writer.finish().map_err(archive_err)?;
    debug!(panels = panels.len(), bytes = cursor.get_ref().len(), "Assembled archive");
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    fn sample_panels() -> Vec<ExportPanel> {
        vec![
            ExportPanel::new(1, 0, JPEG_MAGIC.to_vec(), Some("NOVA: Hello.".to_string())),
            ExportPanel::new(2, 0, JPEG_MAGIC.to_vec(), None),
        ]
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn zip_carries_images_and_captions() {
        let bytes = write_zip(&sample_panels(), true).unwrap();
        assert_eq!(
            entry_names(&bytes),
            vec!["panel_001.jpg", "panel_001.txt", "panel_002.jpg"]
        );

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut caption = String::new();
        archive
            .by_name("panel_001.txt")
            .unwrap()
            .read_to_string(&mut caption)
            .unwrap();
        assert_eq!(caption, "NOVA: Hello.");
    }

    #[test]
    fn cbz_is_images_only() {
        let bytes = write_cbz(&sample_panels()).unwrap();
        assert_eq!(entry_names(&bytes), vec!["panel_001.jpg", "panel_002.jpg"]);
    }

    #[test]
    fn empty_batch_is_an_error() {
        assert!(write_zip(&[], true).is_err());
    }
}
