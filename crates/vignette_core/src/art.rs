//! Generation results for a single panel.

use crate::MediaSource;
use serde::{Deserialize, Serialize};

/// A successfully generated panel illustration.
///
/// Carries the exact prompt text sent to the provider so exports and reruns
/// can reproduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_new::new)]
pub struct PanelArt {
    /// The prompt text used for generation
    pub prompt: String,
    /// The generated image
    pub image: MediaSource,
}

/// Per-panel generation result: an image or an error, never both.
///
/// Individual panel failures are recorded here without aborting the rest of
/// the batch.
///
/// # Examples
///
/// ```
/// use vignette_core::{MediaSource, PanelArt, PanelOutcome};
///
/// let ok = PanelOutcome::Done(PanelArt::new(
///     "a rooftop chase".to_string(),
///     MediaSource::Binary(vec![0xFF, 0xD8]),
/// ));
/// assert!(ok.art().is_some());
///
/// let failed = PanelOutcome::Failed("HTTP 500".to_string());
/// assert!(failed.art().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelOutcome {
    /// Generation succeeded
    Done(PanelArt),
    /// Generation failed with a human-readable message
    Failed(String),
}

impl PanelOutcome {
    /// The generated art, if this outcome is a success.
    pub fn art(&self) -> Option<&PanelArt> {
        match self {
            PanelOutcome::Done(art) => Some(art),
            PanelOutcome::Failed(_) => None,
        }
    }

    /// The failure message, if this outcome is an error.
    pub fn error(&self) -> Option<&str> {
        match self {
            PanelOutcome::Done(_) => None,
            PanelOutcome::Failed(message) => Some(message),
        }
    }
}
