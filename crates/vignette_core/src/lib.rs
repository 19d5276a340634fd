//! Core data types for the Vignette comic generator.
//!
//! This crate provides the foundation data types used across all Vignette
//! crates: panels, panel plans, media sources, image requests, and the
//! progress reporting interface.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod art;
mod media;
mod panel;
mod plan;
mod progress;
mod request;
mod style;

pub use art::{PanelArt, PanelOutcome};
pub use media::MediaSource;
pub use panel::Panel;
pub use plan::{PanelPlan, PlannedPanel};
pub use progress::{NullProgress, ProgressReporter};
pub use request::{ImageRequest, ImageRequestBuilder};
pub use style::ComicStyle;
