//! The panel type, one discrete comic illustration unit.

use serde::{Deserialize, Serialize};

/// One discrete comic illustration unit: a scene description and optional
/// dialogue.
///
/// Panels are produced by segmenting a free-text script; see the
/// `vignette_script` crate for the parsing rules.
///
/// # Examples
///
/// ```
/// use vignette_core::Panel;
///
/// let panel = Panel {
///     description: "A dark alley at night. A figure walks.".to_string(),
///     dialogue: Some("NOVA: Hello.".to_string()),
/// };
/// assert!(panel.has_dialogue());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    /// Scene description driving image generation
    pub description: String,
    /// Attributed dialogue lines ("NAME: line"), if any
    pub dialogue: Option<String>,
}

impl Panel {
    /// Create a description-only panel.
    pub fn from_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            dialogue: None,
        }
    }

    /// Check whether this panel carries dialogue.
    ///
    /// A panel whose dialogue is an empty string counts as silent; the merge
    /// pass in the parser relies on this.
    pub fn has_dialogue(&self) -> bool {
        self.dialogue.as_deref().is_some_and(|d| !d.trim().is_empty())
    }
}
