//! Concurrent batch orchestration.
//!
//! [`run_batch`] discovers every supported video file directly inside a
//! directory (non-recursive) and fans the per-file pipeline out over a
//! bounded rayon worker pool. Each file succeeds or fails in isolation; the
//! whole batch always runs to completion and is summarised in a
//! [`BatchReport`].
//!
//! Results are aggregated at a single collection point — the parallel
//! iterator's `collect` — so no success/failure counters are shared between
//! workers.

use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::{
    config::{SheetConfig, VIDEO_EXTENSIONS},
    error::SheetError,
    extract::FrameExtractor,
    font::SheetFont,
    pipeline::{SheetOutcome, generate_sheet},
    probe::MediaProber,
};

/// Summary of one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct BatchReport {
    /// Number of video files discovered and dispatched.
    pub total: usize,
    /// Files whose sheet was generated or already existed.
    pub successful: usize,
    /// Files whose pipeline failed at any stage.
    pub failed: usize,
    /// Wall-clock time for the whole batch.
    pub elapsed: Duration,
}

/// Trait for observing per-file batch progress.
///
/// Implementations must be [`Send`] and [`Sync`] because notifications are
/// delivered from worker threads. `index` is the file's position in
/// submission order (not completion order), so observers can render stable
/// `[i/N]` progress lines.
pub trait BatchObserver: Send + Sync {
    /// Called once per file, after its pipeline finished.
    fn on_item(
        &self,
        index: usize,
        total: usize,
        path: &Path,
        result: &Result<SheetOutcome, SheetError>,
    );
}

/// A [`BatchObserver`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl BatchObserver for SilentObserver {
    fn on_item(
        &self,
        _index: usize,
        _total: usize,
        _path: &Path,
        _result: &Result<SheetOutcome, SheetError>,
    ) {
    }
}

/// Whether `path` carries a supported video extension (case-insensitive).
pub fn is_supported_video(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            let lowered = extension.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&lowered.as_str())
        })
}

/// List the supported video files directly inside `directory`.
///
/// Non-recursive: subdirectories are ignored, as are regular files with
/// unsupported extensions. The result is sorted by path so batch numbering
/// is deterministic.
///
/// # Errors
///
/// Returns [`SheetError::Io`] when the directory cannot be read at all;
/// individual unreadable entries are skipped.
pub fn find_video_files(directory: &Path) -> Result<Vec<PathBuf>, SheetError> {
    let mut video_files: Vec<PathBuf> = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                log::warn!("Skipping unreadable directory entry: {error}");
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_supported_video(&path) {
            video_files.push(path);
        }
    }

    video_files.sort();
    Ok(video_files)
}

/// Generate contact sheets for every supported video in `directory`.
///
/// Discovery is non-recursive. An empty directory yields a zero
/// [`BatchReport`] without error. Otherwise every file is dispatched eagerly
/// onto a dedicated rayon pool of `config.workers` threads; completion order
/// is unconstrained. [`SheetOutcome::Generated`] and
/// [`SheetOutcome::Skipped`] both count as successful; any pipeline error
/// counts as failed and is reported through the observer without stopping
/// the batch.
///
/// # Errors
///
/// Returns [`SheetError::Io`] when the directory cannot be listed, or
/// [`SheetError::Setup`] when the worker pool cannot be built. Per-file
/// failures never surface here — they are tallied in the report.
pub fn run_batch(
    directory: &Path,
    prober: &dyn MediaProber,
    extractor: &dyn FrameExtractor,
    font: &SheetFont,
    config: &SheetConfig,
    observer: &dyn BatchObserver,
) -> Result<BatchReport, SheetError> {
    let video_files = find_video_files(directory)?;
    let total = video_files.len();

    if total == 0 {
        log::info!("No video files found in {}", directory.display());
        return Ok(BatchReport {
            total: 0,
            successful: 0,
            failed: 0,
            elapsed: Duration::ZERO,
        });
    }

    log::info!("Found {total} video files in {}", directory.display());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()
        .map_err(|error| SheetError::Setup {
            reason: format!("could not build worker pool: {error}"),
        })?;

    let started = Instant::now();

    let results: Vec<Result<SheetOutcome, SheetError>> = pool.install(|| {
        video_files
            .par_iter()
            .enumerate()
            .map(|(index, path)| {
                let result = generate_sheet(path, prober, extractor, font, config);
                observer.on_item(index, total, path, &result);
                result
            })
            .collect()
    });

    let elapsed = started.elapsed();

    let successful = results.iter().filter(|result| result.is_ok()).count();
    let failed = total - successful;

    Ok(BatchReport {
        total,
        successful,
        failed,
        elapsed,
    })
}
