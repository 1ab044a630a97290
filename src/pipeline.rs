//! Per-file sheet generation pipeline.
//!
//! [`generate_sheet`] runs the full sequence for one input: idempotence
//! check → probe → sample → extract → compose → persist. Each stage
//! short-circuits on failure; sub-stage failures (a single frame that will
//! not decode) degrade instead of aborting.
//!
//! The output path is derived deterministically from the input path — same
//! directory, same stem, `_sheet.jpg` suffix — and its existence is the sole
//! idempotence signal. An existing sheet is never re-generated, regardless of
//! whether the source video changed since.

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use image::{DynamicImage, codecs::jpeg::JpegEncoder};

use crate::{
    compose::compose_sheet,
    config::SheetConfig,
    error::SheetError,
    extract::FrameExtractor,
    font::SheetFont,
    probe::MediaProber,
    sampling::sample_timestamps,
};

/// Result of one pipeline run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum SheetOutcome {
    /// A new sheet was composed and written to the contained path.
    Generated(PathBuf),
    /// The sheet already existed at the contained path; nothing was probed,
    /// decoded, or written.
    Skipped(PathBuf),
}

impl SheetOutcome {
    /// The sheet path, whether freshly generated or pre-existing.
    pub fn sheet_path(&self) -> &Path {
        match self {
            SheetOutcome::Generated(path) | SheetOutcome::Skipped(path) => path,
        }
    }
}

/// Derive the sheet path for a video: same directory, `<stem>_sheet.jpg`.
pub fn sheet_output_path(video_path: &Path) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    video_path.with_file_name(format!("{stem}_sheet.jpg"))
}

/// Generate the contact sheet for a single video file.
///
/// Steps, each short-circuiting on failure:
///
/// 1. If the derived output path exists, return [`SheetOutcome::Skipped`]
///    without touching the prober or extractor.
/// 2. Probe metadata.
/// 3. Sample `rows × columns` gap-padded timestamps from the probed duration.
/// 4. Extract one frame per timestamp; individual failures drop their grid
///    slot with a warning. All slots dropped is an extraction failure.
/// 5. Compose the sheet.
/// 6. Encode it as JPEG at the configured quality.
///
/// # Errors
///
/// [`SheetError::Probe`], [`SheetError::Extraction`],
/// [`SheetError::Composition`], or [`SheetError::Write`], mapping one-to-one
/// onto the stage that failed.
pub fn generate_sheet(
    video_path: &Path,
    prober: &dyn MediaProber,
    extractor: &dyn FrameExtractor,
    font: &SheetFont,
    config: &SheetConfig,
) -> Result<SheetOutcome, SheetError> {
    let output_path = sheet_output_path(video_path);

    if output_path.exists() {
        log::debug!("Sheet already exists at {}", output_path.display());
        return Ok(SheetOutcome::Skipped(output_path));
    }

    let info = prober.probe(video_path)?;
    log::debug!(
        "Probed {}: {:.3}s, {}, {}, {}",
        video_path.display(),
        info.duration_seconds,
        info.resolution,
        info.codec,
        info.size_label,
    );

    let timestamps = sample_timestamps(info.duration_seconds, config.thumbnail_count());

    let mut thumbnails: Vec<(DynamicImage, f64)> = Vec::with_capacity(timestamps.len());
    for &timestamp_seconds in &timestamps {
        match extractor.extract(video_path, timestamp_seconds) {
            Ok(image) => thumbnails.push((image, timestamp_seconds)),
            Err(error) => {
                log::warn!(
                    "Dropping thumbnail at {timestamp_seconds:.3}s for {}: {error}",
                    video_path.display()
                );
            }
        }
    }

    if thumbnails.is_empty() {
        return Err(SheetError::Extraction {
            path: video_path.to_path_buf(),
            reason: format!("all {} sampled frames failed to extract", timestamps.len()),
        });
    }

    let sheet = compose_sheet(video_path, &thumbnails, &info, font, config)?;

    write_jpeg(&sheet, &output_path, config.jpeg_quality)?;
    log::debug!("Wrote sheet to {}", output_path.display());

    Ok(SheetOutcome::Generated(output_path))
}

/// Encode the composed sheet as a JPEG at the given quality.
///
/// The sheet is composed in RGBA (the timecode overlays need alpha
/// blending) but JPEG carries no alpha channel, so it is flattened to RGB
/// here.
fn write_jpeg(sheet: &image::RgbaImage, output_path: &Path, quality: u8) -> Result<(), SheetError> {
    let write_error = |reason: String| SheetError::Write {
        path: output_path.to_path_buf(),
        reason,
    };

    let file = File::create(output_path).map_err(|error| write_error(error.to_string()))?;
    let mut writer = BufWriter::new(file);
    let mut encoder = JpegEncoder::new_with_quality(&mut writer, quality);

    let flattened = DynamicImage::ImageRgba8(sheet.clone()).to_rgb8();
    encoder
        .encode_image(&flattened)
        .map_err(|error| write_error(error.to_string()))
}
