//! EPUB 3 package assembly.
//!
//! The package is an ordinary ZIP with a fixed shape: the `mimetype` entry
//! first and stored uncompressed, `META-INF/container.xml` pointing at the
//! OPF, and an `OEBPS/` tree holding the content document per panel, its
//! image, the nav document, and `content.opf` with a manifest and linear
//! spine.

use std::io::{Cursor, Write};
use tracing::debug;
use vignette_error::{ExportError, ExportErrorKind, VignetteResult};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::ExportPanel;
use crate::fetch::{sniff_extension, sniff_mime};

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

fn epub_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::new(ExportErrorKind::Epub(e.to_string()))
}

/// Assemble an EPUB with one content page per panel.
///
/// # Errors
///
/// [`ExportErrorKind::Empty`] when `panels` is empty.
pub fn write_epub(title: &str, panels: &[ExportPanel]) -> VignetteResult<Vec<u8>> {
    if panels.is_empty() {
        return Err(ExportError::new(ExportErrorKind::Empty).into());
    }

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    // The mimetype entry must be first and uncompressed so readers can
    // identify the package from its leading bytes.
    writer.start_file("mimetype", stored).map_err(epub_err)?;
    writer
        .write_all(b"application/epub+zip")
        .map_err(epub_err)?;

    writer
        .start_file("META-INF/container.xml", deflated)
        .map_err(epub_err)?;
    writer
        .write_all(CONTAINER_XML.as_bytes())
        .map_err(epub_err)?;

    writer
        .start_file("OEBPS/content.opf", deflated)
        .map_err(epub_err)?;
    writer
        .write_all(package_document(title, panels).as_bytes())
        .map_err(epub_err)?;

    writer
        .start_file("OEBPS/nav.xhtml", deflated)
        .map_err(epub_err)?;
    writer
        .write_all(nav_document(title, panels).as_bytes())
        .map_err(epub_err)?;

    for panel in panels {
        let ext = sniff_extension(&panel.image);
        writer
            .start_file(format!("OEBPS/images/panel_{:03}.{}", panel.number, ext), deflated)
            .map_err(epub_err)?;
        writer.write_all(&panel.image).map_err(epub_err)?;

        writer
            .start_file(format!("OEBPS/panel_{:03}.xhtml", panel.number), deflated)
            .map_err(epub_err)?;
        writer
            .write_all(panel_document(panel, ext).as_bytes())
            .map_err(epub_err)?;
    }

    let cursor = writer.finish().map_err(epub_err)?;
    debug!(panels = panels.len(), bytes = cursor.get_ref().len(), "Assembled EPUB");
    Ok(cursor.into_inner())
}

fn package_document(title: &str, panels: &[ExportPanel]) -> String {
    let mut manifest = String::from(
        "    <item id=\"nav\" href=\"nav.xhtml\" media-type=\"application/xhtml+xml\" properties=\"nav\"/>\n",
    );
    let mut spine = String::new();
    for panel in panels {
        let n = panel.number;
        let ext = sniff_extension(&panel.image);
        let mime = sniff_mime(&panel.image);
        manifest.push_str(&format!(
            "    <item id=\"panel{n:03}\" href=\"panel_{n:03}.xhtml\" media-type=\"application/xhtml+xml\"/>\n"
        ));
        manifest.push_str(&format!(
            "    <item id=\"img{n:03}\" href=\"images/panel_{n:03}.{ext}\" media-type=\"{mime}\"/>\n"
        ));
        spine.push_str(&format!("    <itemref idref=\"panel{n:03}\"/>\n"));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="pub-id">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="pub-id">urn:vignette:{slug}</dc:identifier>
    <dc:title>{title}</dc:title>
    <dc:language>en</dc:language>
    <meta property="dcterms:modified">{modified}</meta>
  </metadata>
  <manifest>
{manifest}  </manifest>
  <spine>
{spine}  </spine>
</package>
"#,
        slug = slugify(title),
        title = xml_escape(title),
        modified = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
    )
}

fn nav_document(title: &str, panels: &[ExportPanel]) -> String {
    let mut items = String::new();
    for panel in panels {
        items.push_str(&format!(
            "        <li><a href=\"panel_{0:03}.xhtml\">Panel {0}</a></li>\n",
            panel.number
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
  <head><title>{title}</title></head>
  <body>
    <nav epub:type="toc">
      <ol>
{items}      </ol>
    </nav>
  </body>
</html>
"#,
        title = xml_escape(title),
    )
}

fn panel_document(panel: &ExportPanel, ext: &str) -> String {
    let caption = panel
        .caption
        .as_deref()
        .map(|text| format!("    <p class=\"caption\">{}</p>\n", xml_escape(text)))
        .unwrap_or_default();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head><title>Panel {n}</title></head>
  <body>
    <img src="images/panel_{n:03}.{ext}" alt="Panel {n}"/>
{caption}  </body>
</html>
"#,
        n = panel.number,
    )
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let trimmed = slug.trim_matches('-');
    if trimmed.is_empty() {
        "comic".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    fn sample_panels() -> Vec<ExportPanel> {
        vec![
            ExportPanel::new(1, 0, JPEG_MAGIC.to_vec(), Some("NOVA: <hi> & bye".to_string())),
            ExportPanel::new(2, 0, JPEG_MAGIC.to_vec(), None),
        ]
    }

    #[test]
    fn mimetype_is_first_and_stored() {
        let bytes = write_epub("Test Comic", &sample_panels()).unwrap();
        // The first local file header must name `mimetype` with method 0.
        assert_eq!(&bytes[30..38], b"mimetype");

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn package_lists_every_panel_in_spine_order() {
        let bytes = write_epub("Test Comic", &sample_panels()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut opf = String::new();
        archive
            .by_name("OEBPS/content.opf")
            .unwrap()
            .read_to_string(&mut opf)
            .unwrap();
        assert!(opf.contains("panel_001.xhtml"));
        assert!(opf.contains("panel_002.xhtml"));
        let first = opf.find("idref=\"panel001\"").unwrap();
        let second = opf.find("idref=\"panel002\"").unwrap();
        assert!(first < second);
    }

    #[test]
    fn captions_are_escaped() {
        let bytes = write_epub("Test Comic", &sample_panels()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut page = String::new();
        archive
            .by_name("OEBPS/panel_001.xhtml")
            .unwrap()
            .read_to_string(&mut page)
            .unwrap();
        assert!(page.contains("&lt;hi&gt; &amp; bye"));
        assert!(!page.contains("<hi>"));
    }

    #[test]
    fn empty_batch_is_an_error() {
        assert!(write_epub("Test Comic", &[]).is_err());
    }
}
