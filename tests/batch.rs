//! Batch orchestration integration tests.
//!
//! Driven entirely with mock probers/extractors over tempdir fixtures:
//! discovery filtering, per-file failure isolation, skip accounting, and the
//! observer contract.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use image::{DynamicImage, Rgb, RgbImage};
use vidsheet::{
    BatchObserver, FrameExtractor, MediaProber, SheetConfig, SheetError, SheetFont,
    SheetOutcome, VideoInfo, find_video_files, run_batch, sheet_output_path,
};

/// Probes succeed unless the filename contains `"bad"`.
struct SelectiveProber;

impl MediaProber for SelectiveProber {
    fn probe(&self, path: &Path) -> Result<VideoInfo, SheetError> {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        if name.contains("bad") {
            return Err(SheetError::Probe {
                path: path.to_path_buf(),
                reason: "simulated probe failure".to_string(),
            });
        }
        Ok(VideoInfo {
            duration_seconds: 30.0,
            resolution: "64x48".to_string(),
            size_label: "0.50 MB".to_string(),
            codec: "vp9".to_string(),
        })
    }
}

struct SolidExtractor;

impl FrameExtractor for SolidExtractor {
    fn extract(&self, _path: &Path, _timestamp: f64) -> Result<DynamicImage, SheetError> {
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            64,
            48,
            Rgb([90, 120, 150]),
        )))
    }
}

/// Records every observer notification.
#[derive(Default)]
struct RecordingObserver {
    items: Mutex<Vec<(usize, usize, PathBuf, bool)>>,
}

impl BatchObserver for RecordingObserver {
    fn on_item(
        &self,
        index: usize,
        total: usize,
        path: &Path,
        result: &Result<SheetOutcome, SheetError>,
    ) {
        self.items
            .lock()
            .unwrap()
            .push((index, total, path.to_path_buf(), result.is_ok()));
    }
}

fn small_config() -> SheetConfig {
    SheetConfig::new()
        .with_grid(2, 2)
        .with_sheet_width(320)
        .with_workers(2)
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

fn touch(path: &Path) {
    std::fs::write(path, b"fixture").expect("Failed to write fixture file");
}

#[test]
fn discovery_filters_by_extension_and_ignores_subdirectories() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    touch(&directory.path().join("a.mp4"));
    touch(&directory.path().join("B.MKV"));
    touch(&directory.path().join("notes.txt"));
    touch(&directory.path().join("no_extension"));
    let nested = directory.path().join("nested");
    std::fs::create_dir(&nested).expect("Failed to create subdirectory");
    touch(&nested.join("inner.mp4"));

    let found = find_video_files(directory.path()).expect("discovery should succeed");
    let names: Vec<String> = found
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["B.MKV", "a.mp4"]);
}

#[test]
fn empty_directory_yields_zero_report() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");

    let report = run_batch(
        directory.path(),
        &SelectiveProber,
        &SolidExtractor,
        &font,
        &small_config(),
        &RecordingObserver::default(),
    )
    .expect("empty directory is not an error");

    assert_eq!(report.total, 0);
    assert_eq!(report.successful, 0);
    assert_eq!(report.failed, 0);
}

#[test]
fn one_failing_file_does_not_stop_the_batch() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    touch(&directory.path().join("one.mp4"));
    touch(&directory.path().join("two.mkv"));
    touch(&directory.path().join("three.webm"));
    touch(&directory.path().join("bad.mp4"));

    let observer = RecordingObserver::default();
    let report = run_batch(
        directory.path(),
        &SelectiveProber,
        &SolidExtractor,
        &font,
        &small_config(),
        &observer,
    )
    .expect("batch itself should succeed");

    assert_eq!(report.total, 4);
    assert_eq!(report.successful, 3);
    assert_eq!(report.failed, 1);

    // The three good files got sheets; the bad one did not.
    assert!(sheet_output_path(&directory.path().join("one.mp4")).exists());
    assert!(sheet_output_path(&directory.path().join("two.mkv")).exists());
    assert!(sheet_output_path(&directory.path().join("three.webm")).exists());
    assert!(!sheet_output_path(&directory.path().join("bad.mp4")).exists());

    // One observer notification per file, each carrying the right total.
    let items = observer.items.lock().unwrap();
    assert_eq!(items.len(), 4);
    assert!(items.iter().all(|(_, total, _, _)| *total == 4));
    let failures = items.iter().filter(|(_, _, _, ok)| !ok).count();
    assert_eq!(failures, 1);
}

#[test]
fn pre_existing_sheets_count_as_successful() {
    let Some(font) = load_font() else { return };
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let video = directory.path().join("seen.mp4");
    touch(&video);
    touch(&sheet_output_path(&video));

    let report = run_batch(
        directory.path(),
        &SelectiveProber,
        &SolidExtractor,
        &font,
        &small_config(),
        &RecordingObserver::default(),
    )
    .expect("batch should succeed");

    assert_eq!(report.total, 1);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 0);
}
