//! Visual style selection.

use serde::{Deserialize, Serialize};

/// Visual styles for panel rendering.
///
/// The style contributes a fragment to every panel prompt; see
/// `vignette_script::build_prompt`.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use vignette_core::ComicStyle;
///
/// let style = ComicStyle::from_str("manga").unwrap();
/// assert_eq!(style.to_string(), "manga");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ComicStyle {
    /// Classic western color comic
    #[default]
    WesternColor,
    /// Black-and-white manga
    Manga,
    /// High-contrast noir
    Noir,
    /// Soft watercolor illustration
    Watercolor,
    /// Retro pixel art
    PixelArt,
    /// Loose pencil sketch
    Sketch,
}

impl ComicStyle {
    /// Prompt fragment appended to every panel description for this style.
    pub fn prompt_fragment(&self) -> &'static str {
        match self {
            ComicStyle::WesternColor => {
                "classic western comic book style, bold ink outlines, vibrant colors"
            }
            ComicStyle::Manga => "black and white manga style, screentone shading, dynamic framing",
            ComicStyle::Noir => "noir comic style, heavy shadows, high contrast, moody lighting",
            ComicStyle::Watercolor => "soft watercolor illustration, muted palette, loose edges",
            ComicStyle::PixelArt => "retro pixel art, limited palette, crisp dithering",
            ComicStyle::Sketch => "loose pencil sketch, crosshatching, unfinished linework",
        }
    }
}
