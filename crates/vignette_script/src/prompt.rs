//! Per-panel prompt assembly.

use vignette_core::{ComicStyle, Panel};

/// Assemble the image generation prompt for a panel.
///
/// The prompt combines the panel description with the style's prompt
/// fragment. Dialogue is not included; it is rendered as a caption at
/// export time rather than painted into the image.
///
/// # Examples
///
/// ```
/// use vignette_core::{ComicStyle, Panel};
/// use vignette_script::build_prompt;
///
/// let panel = Panel::from_description("A figure walks.");
/// let prompt = build_prompt(&panel, ComicStyle::Noir);
/// assert!(prompt.contains("A figure walks."));
/// assert!(prompt.contains("noir"));
/// ```
pub fn build_prompt(panel: &Panel, style: ComicStyle) -> String {
    format!(
        "comic book panel, {}. {}",
        style.prompt_fragment(),
        panel.description.trim()
    )
}
