//! Batch generation behavior with a scripted fake driver.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use vignette::{
    ImageDriver, ImageRequest, MediaSource, PanelArt, ProgressReporter, ScriptDriver, Studio,
    StudioOptions, VignetteResult,
};
use vignette_error::{ProviderError, ProviderErrorKind};

const SCRIPT: &str = "EXT. ALLEY - NIGHT\nA figure walks.\n\nNOVA\nHello.";

/// Succeeds except on the panel indices listed in `fail_on`.
struct FakeDriver {
    calls: AtomicUsize,
    fail_on: Vec<usize>,
}

impl FakeDriver {
    fn new(fail_on: Vec<usize>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_on,
        }
    }
}

#[async_trait]
impl ImageDriver for FakeDriver {
    async fn generate_image(&self, req: &ImageRequest) -> VignetteResult<PanelArt> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&call) {
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: 500,
                message: "boom".to_string(),
            })
            .into());
        }
        Ok(PanelArt::new(
            req.prompt.clone(),
            MediaSource::Binary(vec![0xFF, 0xD8]),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

struct FailingScriptDriver;

#[async_trait]
impl ScriptDriver for FailingScriptDriver {
    async fn rewrite_script(&self, _story: &str) -> VignetteResult<String> {
        Err(ProviderError::new(ProviderErrorKind::EmptyResponse).into())
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

struct RecordingProgress {
    events: Mutex<Vec<(String, usize)>>,
}

impl ProgressReporter for RecordingProgress {
    fn panel_started(&self, index: usize, _total: usize) {
        self.events
            .lock()
            .unwrap()
            .push(("started".to_string(), index));
    }

    fn panel_finished(&self, index: usize, _total: usize, _ok: bool) {
        self.events
            .lock()
            .unwrap()
            .push(("finished".to_string(), index));
    }
}

fn options(pages: usize, panels_per_page: usize, pacing_ms: u64) -> StudioOptions {
    StudioOptions::builder()
        .title("Test".to_string())
        .pages(pages)
        .panels_per_page(panels_per_page)
        .pacing(Duration::from_millis(pacing_ms))
        .build()
        .unwrap()
}

#[tokio::test]
async fn failures_are_captured_without_aborting_the_batch() {
    let studio = Studio::new(Box::new(FakeDriver::new(vec![1])), options(1, 4, 0));
    let comic = studio.generate(SCRIPT).await.unwrap();

    assert_eq!(comic.success_count(), 3);
    let failures = comic.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, 1);
    assert!(failures[0].1.contains("500"));
}

#[tokio::test]
async fn plan_expands_to_pages_times_panels() {
    let studio = Studio::new(Box::new(FakeDriver::new(vec![])), options(2, 3, 0));
    let comic = studio.generate(SCRIPT).await.unwrap();

    assert_eq!(comic.pages.len(), 2);
    assert_eq!(comic.pages[0].panels.len(), 3);
    assert_eq!(comic.pages[1].panels.len(), 3);
    assert_eq!(comic.success_count(), 6);
}

#[tokio::test(start_paused = true)]
async fn pacing_delay_runs_between_panels_but_not_after_the_last() {
    let start = tokio::time::Instant::now();
    let studio = Studio::new(Box::new(FakeDriver::new(vec![])), options(1, 3, 1000));
    studio.generate(SCRIPT).await.unwrap();

    // Two gaps between three panels.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(2000), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(3000), "elapsed: {elapsed:?}");
}

#[tokio::test]
async fn progress_reporter_sees_every_panel() {
    let progress = Arc::new(RecordingProgress {
        events: Mutex::new(Vec::new()),
    });
    let studio = Studio::new(Box::new(FakeDriver::new(vec![0])), options(1, 2, 0))
        .with_progress(progress.clone());
    studio.generate(SCRIPT).await.unwrap();

    let events = progress.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            ("started".to_string(), 0),
            ("finished".to_string(), 0),
            ("started".to_string(), 1),
            ("finished".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn enhancement_failure_falls_back_to_original_input() {
    let studio = Studio::new(Box::new(FakeDriver::new(vec![])), options(1, 2, 0))
        .with_script_driver(Box::new(FailingScriptDriver));
    let comic = studio.generate(SCRIPT).await.unwrap();

    // The original screenplay still parses and generates.
    assert_eq!(comic.success_count(), 2);
    let first = &comic.pages[0].panels[0];
    assert!(first.planned.panel.description.contains("figure walks"));
}

#[tokio::test]
async fn zero_pages_is_a_configuration_error() {
    let studio = Studio::new(
        Box::new(FakeDriver::new(vec![])),
        StudioOptions {
            pages: 0,
            ..StudioOptions::default()
        },
    );
    assert!(studio.generate(SCRIPT).await.is_err());
}
