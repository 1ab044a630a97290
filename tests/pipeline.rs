//! Per-file pipeline integration tests.
//!
//! These tests drive [`vidsheet::generate_sheet`] with mock probers and
//! extractors so they run without FFmpeg fixtures. They verify the
//! idempotent-skip contract, stage-by-stage failure mapping, and graceful
//! degradation of partial extraction failures.

use std::{
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use image::{DynamicImage, Rgb, RgbImage};
use vidsheet::{
    FrameExtractor, MediaProber, SheetConfig, SheetError, SheetFont, SheetOutcome, VideoInfo,
    generate_sheet, sheet_output_path,
};

/// A prober that returns canned metadata and counts its invocations.
struct FakeProber {
    calls: AtomicUsize,
    duration_seconds: f64,
    fail: bool,
}

impl FakeProber {
    fn with_duration(duration_seconds: f64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            duration_seconds,
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            duration_seconds: 0.0,
            fail: true,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MediaProber for FakeProber {
    fn probe(&self, path: &Path) -> Result<VideoInfo, SheetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SheetError::Probe {
                path: path.to_path_buf(),
                reason: "simulated probe failure".to_string(),
            });
        }
        Ok(VideoInfo {
            duration_seconds: self.duration_seconds,
            resolution: "64x48".to_string(),
            size_label: "1.00 MB".to_string(),
            codec: "h264".to_string(),
        })
    }
}

/// An extractor that returns solid frames, optionally failing some calls.
struct FakeExtractor {
    seen_timestamps: Mutex<Vec<f64>>,
    /// Fail every call whose index (0-based) satisfies this predicate.
    fail_call: fn(usize) -> bool,
}

impl FakeExtractor {
    fn always_ok() -> Self {
        Self {
            seen_timestamps: Mutex::new(Vec::new()),
            fail_call: |_| false,
        }
    }

    fn failing_all() -> Self {
        Self {
            seen_timestamps: Mutex::new(Vec::new()),
            fail_call: |_| true,
        }
    }

    fn failing_every_other() -> Self {
        Self {
            seen_timestamps: Mutex::new(Vec::new()),
            fail_call: |index| index % 2 == 1,
        }
    }

    fn call_count(&self) -> usize {
        self.seen_timestamps.lock().unwrap().len()
    }
}

impl FrameExtractor for FakeExtractor {
    fn extract(
        &self,
        path: &Path,
        timestamp_seconds: f64,
    ) -> Result<DynamicImage, SheetError> {
        let mut seen = self.seen_timestamps.lock().unwrap();
        let index = seen.len();
        seen.push(timestamp_seconds);

        if (self.fail_call)(index) {
            return Err(SheetError::Extraction {
                path: path.to_path_buf(),
                reason: format!("simulated decode failure at {timestamp_seconds:.3}s"),
            });
        }
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            64,
            48,
            Rgb([180, 180, 180]),
        )))
    }
}

fn small_config() -> SheetConfig {
    SheetConfig::new().with_grid(2, 2).with_sheet_width(320)
}

fn load_font() -> Option<SheetFont> {
    match SheetFont::load(None) {
        Ok(font) => Some(font),
        Err(_) => {
            eprintln!("no system font available, skipping");
            None
        }
    }
}

fn fake_video(directory: &Path) -> PathBuf {
    let path = directory.join("clip.mp4");
    std::fs::write(&path, b"not a real video").expect("Failed to write input file");
    path
}

#[test]
fn generates_then_skips_without_reprobing() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = fake_video(directory.path());

    let prober = FakeProber::with_duration(120.0);
    let extractor = FakeExtractor::always_ok();
    let config = small_config();

    let first = generate_sheet(&video, &prober, &extractor, &font, &config)
        .expect("first run should generate");
    let expected_output = sheet_output_path(&video);
    assert_eq!(first, SheetOutcome::Generated(expected_output.clone()));
    assert!(expected_output.exists(), "sheet file should be written");
    assert_eq!(prober.call_count(), 1);
    assert_eq!(extractor.call_count(), config.thumbnail_count());

    // Second run: skipped purely on output existence, no work re-done.
    let second = generate_sheet(&video, &prober, &extractor, &font, &config)
        .expect("second run should skip");
    assert_eq!(second, SheetOutcome::Skipped(expected_output));
    assert_eq!(prober.call_count(), 1, "probe must not run again");
    assert_eq!(
        extractor.call_count(),
        config.thumbnail_count(),
        "extraction must not run again"
    );
}

#[test]
fn zero_duration_still_produces_a_sheet() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = fake_video(directory.path());

    let prober = FakeProber::with_duration(0.0);
    let extractor = FakeExtractor::always_ok();
    let config = small_config();

    let outcome = generate_sheet(&video, &prober, &extractor, &font, &config)
        .expect("corrupt duration must not fail the pipeline");
    assert!(matches!(outcome, SheetOutcome::Generated(_)));

    // Every sample collapses to frame 0.
    let seen = extractor.seen_timestamps.lock().unwrap();
    assert_eq!(seen.len(), config.thumbnail_count());
    assert!(seen.iter().all(|&timestamp| timestamp == 0.0));
}

#[test]
fn probe_failure_aborts_before_extraction() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = fake_video(directory.path());

    let prober = FakeProber::failing();
    let extractor = FakeExtractor::always_ok();

    let result = generate_sheet(&video, &prober, &extractor, &font, &small_config());
    assert!(matches!(result, Err(SheetError::Probe { .. })));
    assert_eq!(extractor.call_count(), 0);
    assert!(!sheet_output_path(&video).exists());
}

#[test]
fn all_extractions_failing_is_an_extraction_error() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = fake_video(directory.path());

    let prober = FakeProber::with_duration(60.0);
    let extractor = FakeExtractor::failing_all();

    let result = generate_sheet(&video, &prober, &extractor, &font, &small_config());
    assert!(matches!(result, Err(SheetError::Extraction { .. })));
    assert!(!sheet_output_path(&video).exists());
}

#[test]
fn partial_extraction_failures_degrade_gracefully() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = fake_video(directory.path());

    let prober = FakeProber::with_duration(60.0);
    let extractor = FakeExtractor::failing_every_other();

    let outcome = generate_sheet(&video, &prober, &extractor, &font, &small_config())
        .expect("half the thumbnails is still a sheet");
    assert!(matches!(outcome, SheetOutcome::Generated(_)));
}
