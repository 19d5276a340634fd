//! Sequential batch generation.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use vignette_core::{
    ComicStyle, ImageRequest, NullProgress, PanelOutcome, PanelPlan, ProgressReporter,
};
use vignette_error::VignetteResult;
use vignette_models::{ImageDriver, ScriptDriver};
use vignette_script::{build_prompt, parse_script};

use crate::comic::{Comic, RenderedPanel};

/// Batch generation options.
///
/// # Examples
///
/// ```
/// use vignette::StudioOptions;
///
/// let options = StudioOptions::builder()
///     .title("Night Shift".to_string())
///     .pages(2)
///     .build()
///     .unwrap();
/// assert_eq!(options.panels_per_page, 4);
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(default)]
pub struct StudioOptions {
    /// Comic title
    pub title: String,
    /// Number of pages to generate
    pub pages: usize,
    /// Panels on each page
    pub panels_per_page: usize,
    /// Visual style applied to every panel prompt
    pub style: ComicStyle,
    /// Delay between successive provider calls; skipped after the last panel
    pub pacing: Duration,
}

impl Default for StudioOptions {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            pages: 1,
            panels_per_page: 4,
            style: ComicStyle::default(),
            pacing: Duration::from_millis(1000),
        }
    }
}

impl StudioOptions {
    /// Start building options.
    pub fn builder() -> StudioOptionsBuilder {
        StudioOptionsBuilder::default()
    }
}

/// Orchestrates a generation batch: parse, plan, generate one panel at a
/// time, collect outcomes.
///
/// Generation is strictly sequential with a pacing delay between calls.
/// Individual panel failures are captured as [`PanelOutcome::Failed`]
/// without aborting the batch.
pub struct Studio {
    driver: Box<dyn ImageDriver>,
    script_driver: Option<Box<dyn ScriptDriver>>,
    progress: Arc<dyn ProgressReporter>,
    options: StudioOptions,
}

impl Studio {
    /// Create a studio driving the given image provider.
    pub fn new(driver: Box<dyn ImageDriver>, options: StudioOptions) -> Self {
        Self {
            driver,
            script_driver: None,
            progress: Arc::new(NullProgress),
            options,
        }
    }

    /// Enable AI script enhancement before parsing.
    ///
    /// If the rewrite fails the original input is used unchanged.
    pub fn with_script_driver(mut self, driver: Box<dyn ScriptDriver>) -> Self {
        self.script_driver = Some(driver);
        self
    }

    /// Attach a progress reporter.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Generate a comic from a screenplay (or free text).
    ///
    /// # Errors
    ///
    /// Fails only on configuration problems (zero pages or panels per
    /// page). Provider failures are recorded per panel in the result.
    #[instrument(skip(self, script), fields(pages = self.options.pages, panels_per_page = self.options.panels_per_page))]
    pub async fn generate(&self, script: &str) -> VignetteResult<Comic> {
        let script = self.enhance(script).await;
        let parsed = parse_script(&script);
        let plan = PanelPlan::new(&parsed, self.options.pages, self.options.panels_per_page)?;
        let total = plan.total();
        info!(
            parsed = parsed.len(),
            total,
            style = %self.options.style,
            provider = self.driver.provider_name(),
            "Starting batch generation"
        );

        let mut rendered = Vec::with_capacity(total);
        for planned in plan.panels() {
            self.progress.panel_started(planned.index, total);

            let prompt = build_prompt(&planned.panel, self.options.style);
            let request = ImageRequest {
                prompt,
                ..ImageRequest::default()
            };
            let outcome = match self.driver.generate_image(&request).await {
                Ok(art) => PanelOutcome::Done(art),
                Err(e) => {
                    warn!(panel = planned.index, error = %e, "Panel generation failed");
                    PanelOutcome::Failed(e.to_string())
                }
            };

            self.progress
                .panel_finished(planned.index, total, outcome.art().is_some());
            rendered.push(RenderedPanel {
                planned: planned.clone(),
                outcome,
            });

            if planned.index + 1 < total && !self.options.pacing.is_zero() {
                tokio::time::sleep(self.options.pacing).await;
            }
        }

        let comic = Comic::assemble(self.options.title.clone(), self.options.style, rendered);
        info!(
            succeeded = comic.success_count(),
            failed = comic.failures().len(),
            "Batch generation finished"
        );
        Ok(comic)
    }

    /// Run the optional AI rewrite, falling back to the input on failure.
    async fn enhance(&self, script: &str) -> String {
        let Some(driver) = &self.script_driver else {
            return script.to_string();
        };
        match driver.rewrite_script(script).await {
            Ok(rewritten) => {
                info!(provider = driver.provider_name(), "Script enhanced");
                rewritten
            }
            Err(e) => {
                warn!(error = %e, "Script enhancement failed, using original input");
                script.to_string()
            }
        }
    }
}
