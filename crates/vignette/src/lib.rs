//! Vignette turns a screenplay into a comic book.
//!
//! The pipeline: parse the screenplay into panels
//! ([`vignette_script::parse_script`]), expand them onto a page grid
//! ([`vignette_core::PanelPlan`]), generate one image per panel through a
//! provider client ([`vignette_models`]), and export the result as PDF,
//! ZIP, CBZ, or EPUB ([`vignette_export`]).
//!
//! The [`Studio`] orchestrator runs the batch sequentially with pacing
//! between provider calls and captures per-panel failures without aborting
//! the run. API keys live in a [`vignette_keys::KeyStore`]; keyed providers
//! rotate through the pool under rate limits.
//!
//! # Examples
//!
//! ```no_run
//! use vignette::{PollinationsClient, Studio, StudioOptions};
//!
//! # async fn demo() -> vignette::VignetteResult<()> {
//! let studio = Studio::new(
//!     Box::new(PollinationsClient::new()?),
//!     StudioOptions::default(),
//! );
//! let comic = studio
//!     .generate("EXT. ROOFTOP - NIGHT\nA figure leaps between buildings.")
//!     .await?;
//! println!("{} panels generated", comic.success_count());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cli;
mod comic;
mod studio;

pub use cli::{Cli, Commands, ExportFormat, KeyCommands};
pub use comic::{Comic, ComicPage, RenderedPanel};
pub use studio::{Studio, StudioOptions, StudioOptionsBuilder};

pub use vignette_core::{
    ComicStyle, ImageRequest, MediaSource, NullProgress, Panel, PanelArt, PanelOutcome, PanelPlan,
    PlannedPanel, ProgressReporter,
};
pub use vignette_error::{VignetteError, VignetteErrorKind, VignetteResult};
pub use vignette_export::{ExportPanel, PdfLayout, write_cbz, write_epub, write_pdf, write_zip};
pub use vignette_keys::{CREDENTIALS_KEY, KeyPool, KeyStore, RetryPolicy, retry_with_rotation};
pub use vignette_models::{
    GeminiClient, HuggingFaceClient, ImageDriver, ImageProvider, PollinationsClient, ScriptDriver,
};
pub use vignette_script::{build_prompt, parse_script};
pub use vignette_storage::{FileStore, KeyValueStore, MemoryStore};
