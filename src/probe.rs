//! Media metadata probing.
//!
//! [`MediaProber`] is the narrow seam through which the pipeline learns about
//! a video file: duration, resolution, codec, and on-disk size. The default
//! implementation, [`FfmpegProber`], opens the FFmpeg demuxer just long
//! enough to read stream parameters and closes it again.
//!
//! Probing degrades gracefully at field granularity: a stream whose width,
//! height, or codec cannot be read yields `"Unknown"` for that field, and an
//! unreadable duration yields `0.0`. Only a file that cannot be opened as
//! media at all fails the probe.

use std::{fs, path::Path};

use ffmpeg_next::{codec::context::Context as CodecContext, media::Type};

use crate::error::SheetError;

/// Metadata for one video file, as rendered into the sheet header.
///
/// Produced once per input by a [`MediaProber`]; immutable thereafter.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct VideoInfo {
    /// Container duration in seconds. `0.0` when unknown.
    pub duration_seconds: f64,
    /// `"WxH"` (e.g. `"1920x1080"`), or `"Unknown"` when either dimension is
    /// unavailable.
    pub resolution: String,
    /// Human-readable file size (e.g. `"12.34 MB"`), or `"Unknown"`.
    pub size_label: String,
    /// Video codec name (e.g. `"h264"`), or `"Unknown"`.
    pub codec: String,
}

/// Capability for probing video metadata.
///
/// Implementations may call a bound decoding library (the default), shell out
/// to an external tool, or return canned values in tests. The pipeline and
/// orchestrator only ever see this trait.
pub trait MediaProber: Send + Sync {
    /// Probe a video file and return its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Probe`] only when the file cannot be opened or
    /// recognised as media. Individual missing fields degrade to
    /// `"Unknown"` / `0.0` instead of failing.
    fn probe(&self, path: &Path) -> Result<VideoInfo, SheetError>;
}

/// [`MediaProber`] backed by the FFmpeg libraries via `ffmpeg-next`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegProber;

impl FfmpegProber {
    /// Create a new FFmpeg-backed prober.
    pub fn new() -> Self {
        Self
    }
}

impl MediaProber for FfmpegProber {
    fn probe(&self, path: &Path) -> Result<VideoInfo, SheetError> {
        log::debug!("Probing media file: {}", path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| SheetError::Probe {
            path: path.to_path_buf(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| SheetError::Probe {
                path: path.to_path_buf(),
                reason: error.to_string(),
            })?;

        // Container-level duration, in AV_TIME_BASE (microsecond) units.
        // Unknown or negative durations degrade to zero.
        let duration_microseconds = input_context.duration();
        let duration_seconds = if duration_microseconds > 0 {
            duration_microseconds as f64 / f64::from(ffmpeg_sys_next::AV_TIME_BASE)
        } else {
            0.0
        };

        // Resolution and codec come from the best video stream. Any failure
        // along the way leaves the fields at "Unknown" rather than failing
        // the probe.
        let mut resolution = String::from("Unknown");
        let mut codec = String::from("Unknown");

        if let Some(stream) = input_context.streams().best(Type::Video) {
            match CodecContext::from_parameters(stream.parameters()) {
                Ok(decoder_context) => match decoder_context.decoder().video() {
                    Ok(video_decoder) => {
                        let width = video_decoder.width();
                        let height = video_decoder.height();
                        if width > 0 && height > 0 {
                            resolution = format!("{width}x{height}");
                        }
                        if let Some(descriptor) = video_decoder.codec() {
                            codec = descriptor.name().to_string();
                        }
                    }
                    Err(error) => {
                        log::warn!(
                            "Could not build video decoder for {}: {error}",
                            path.display()
                        );
                    }
                },
                Err(error) => {
                    log::warn!(
                        "Could not read codec parameters for {}: {error}",
                        path.display()
                    );
                }
            }
        }

        Ok(VideoInfo {
            duration_seconds,
            resolution,
            size_label: file_size_label(path),
            codec,
        })
    }
}

/// Format the on-disk size of `path` in megabytes with two decimals.
///
/// A filesystem error degrades the label to `"Unknown"` — the probe result is
/// still usable for the header.
pub fn file_size_label(path: &Path) -> String {
    match fs::metadata(path) {
        Ok(metadata) => {
            let megabytes = metadata.len() as f64 / (1024.0 * 1024.0);
            format!("{megabytes:.2} MB")
        }
        Err(error) => {
            log::warn!("Could not stat {}: {error}", path.display());
            String::from("Unknown")
        }
    }
}
