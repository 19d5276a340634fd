//! Cyclic expansion of a parsed panel sequence into a page layout.

use crate::Panel;
use serde::{Deserialize, Serialize};
use vignette_error::{ConfigError, VignetteResult};

/// One slot in a panel plan: a panel assigned to a page position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedPanel {
    /// Zero-based position in the whole comic
    pub index: usize,
    /// Zero-based page number (`index / panels_per_page`)
    pub page: usize,
    /// Zero-based position on the page (`index % panels_per_page`)
    pub slot: usize,
    /// The panel content for this slot
    pub panel: Panel,
}

/// The full layout of a comic: exactly `pages × panels_per_page` planned
/// panels, filled by cyclically repeating the parsed sequence.
///
/// If the parsed sequence is shorter than the requested total, planned panel
/// `i` repeats parsed panel `i % len`.
///
/// # Examples
///
/// ```
/// use vignette_core::{Panel, PanelPlan};
///
/// let parsed = vec![Panel::from_description("A rooftop chase.")];
/// let plan = PanelPlan::new(&parsed, 2, 3).unwrap();
/// assert_eq!(plan.panels().len(), 6);
/// assert_eq!(plan.panels()[4].page, 1);
/// assert_eq!(plan.panels()[4].slot, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelPlan {
    pages: usize,
    panels_per_page: usize,
    panels: Vec<PlannedPanel>,
}

impl PanelPlan {
    /// Expand a parsed panel sequence to exactly `pages × panels_per_page`
    /// planned panels.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `pages`, `panels_per_page`, or the
    /// parsed sequence is empty. The parser guarantees at least one panel
    /// for any input, so an empty sequence indicates a caller bug.
    pub fn new(parsed: &[Panel], pages: usize, panels_per_page: usize) -> VignetteResult<Self> {
        if pages == 0 {
            return Err(ConfigError::new("page count must be at least 1").into());
        }
        if panels_per_page == 0 {
            return Err(ConfigError::new("panels per page must be at least 1").into());
        }
        if parsed.is_empty() {
            return Err(ConfigError::new("parsed panel sequence is empty").into());
        }

        let total = pages * panels_per_page;
        let panels = (0..total)
            .map(|index| PlannedPanel {
                index,
                page: index / panels_per_page,
                slot: index % panels_per_page,
                panel: parsed[index % parsed.len()].clone(),
            })
            .collect();

        Ok(Self {
            pages,
            panels_per_page,
            panels,
        })
    }

    /// Number of pages in the plan.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Number of panels on each page.
    pub fn panels_per_page(&self) -> usize {
        self.panels_per_page
    }

    /// All planned panels in reading order.
    pub fn panels(&self) -> &[PlannedPanel] {
        &self.panels
    }

    /// Total panel count (`pages × panels_per_page`).
    pub fn total(&self) -> usize {
        self.panels.len()
    }
}
