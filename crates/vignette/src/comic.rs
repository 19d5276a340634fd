//! The finished comic: planned panels paired with their outcomes.

use vignette_core::{ComicStyle, PanelOutcome, PlannedPanel};
use vignette_export::ExportPanel;
use vignette_error::VignetteResult;

/// A planned panel together with its generation outcome.
#[derive(Debug, Clone)]
pub struct RenderedPanel {
    /// Where this panel sits in the comic
    pub planned: PlannedPanel,
    /// What generation produced for it
    pub outcome: PanelOutcome,
}

/// One page of the comic in reading order.
#[derive(Debug, Clone)]
pub struct ComicPage {
    /// Zero-based page number
    pub number: usize,
    /// Panels on this page, ordered by slot
    pub panels: Vec<RenderedPanel>,
}

/// A generated comic.
///
/// Failed panels stay in place with their error message so callers can see
/// exactly which slots are missing; exports skip them.
#[derive(Debug, Clone)]
pub struct Comic {
    /// Comic title, used in EPUB metadata and output filenames
    pub title: String,
    /// The visual style the panels were generated in
    pub style: ComicStyle,
    /// Pages in reading order
    pub pages: Vec<ComicPage>,
}

impl Comic {
    /// Group rendered panels into pages.
    pub(crate) fn assemble(title: String, style: ComicStyle, rendered: Vec<RenderedPanel>) -> Self {
        let mut pages: Vec<ComicPage> = Vec::new();
        for panel in rendered {
            match pages.last_mut() {
                Some(page) if page.number == panel.planned.page => page.panels.push(panel),
                _ => pages.push(ComicPage {
                    number: panel.planned.page,
                    panels: vec![panel],
                }),
            }
        }
        Self {
            title,
            style,
            pages,
        }
    }

    /// All rendered panels in reading order.
    pub fn panels(&self) -> impl Iterator<Item = &RenderedPanel> {
        self.pages.iter().flat_map(|page| page.panels.iter())
    }

    /// Number of panels that generated successfully.
    pub fn success_count(&self) -> usize {
        self.panels().filter(|p| p.outcome.art().is_some()).count()
    }

    /// The failed slots: `(panel index, error message)`.
    pub fn failures(&self) -> Vec<(usize, &str)> {
        self.panels()
            .filter_map(|p| p.outcome.error().map(|e| (p.planned.index, e)))
            .collect()
    }

    /// Resolve successful panels into export form, fetching URL-sourced
    /// images and decoding inline base64.
    ///
    /// Failed panels are skipped; their numbering gap stays visible in the
    /// exported file names.
    pub async fn export_panels(&self, client: &reqwest::Client) -> VignetteResult<Vec<ExportPanel>> {
        let mut out = Vec::new();
        for panel in self.panels() {
            let Some(art) = panel.outcome.art() else {
                continue;
            };
            let bytes = vignette_export::resolve_media(client, &art.image).await?;
            out.push(ExportPanel::new(
                panel.planned.index + 1,
                panel.planned.page,
                bytes,
                panel.planned.panel.dialogue.clone(),
            ));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vignette_core::{MediaSource, Panel, PanelArt};

    fn rendered(index: usize, page: usize, ok: bool) -> RenderedPanel {
        let outcome = if ok {
            PanelOutcome::Done(PanelArt::new(
                format!("prompt {index}"),
                MediaSource::Binary(vec![0xFF, 0xD8]),
            ))
        } else {
            PanelOutcome::Failed("HTTP 500".to_string())
        };
        RenderedPanel {
            planned: PlannedPanel {
                index,
                page,
                slot: index % 2,
                panel: Panel::from_description(format!("panel {index}")),
            },
            outcome,
        }
    }

    #[test]
    fn assemble_groups_by_page() {
        let comic = Comic::assemble(
            "Test".to_string(),
            ComicStyle::default(),
            vec![rendered(0, 0, true), rendered(1, 0, false), rendered(2, 1, true)],
        );
        assert_eq!(comic.pages.len(), 2);
        assert_eq!(comic.pages[0].panels.len(), 2);
        assert_eq!(comic.pages[1].number, 1);
        assert_eq!(comic.success_count(), 2);
        assert_eq!(comic.failures(), vec![(1, "HTTP 500")]);
    }

    #[tokio::test]
    async fn export_panels_skip_failures_keeping_numbers() {
        let comic = Comic::assemble(
            "Test".to_string(),
            ComicStyle::default(),
            vec![rendered(0, 0, true), rendered(1, 0, false), rendered(2, 1, true)],
        );
        let client = reqwest::Client::new();
        let panels = comic.export_panels(&client).await.unwrap();
        let numbers: Vec<usize> = panels.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 3]);
    }
}
