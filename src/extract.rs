//! Single-frame extraction.
//!
//! [`FrameExtractor`] is the seam through which the pipeline obtains one
//! decoded still image per sampled timestamp. The default implementation,
//! [`FfmpegFrameExtractor`], opens a fresh demuxer per call, seeks to the
//! nearest keyframe before the target, and decodes forward until the target
//! instant is reached.
//!
//! Each call is independent and order-insensitive. A timestamp that cannot be
//! decoded (for example, one that lies beyond the container's actual content
//! due to inaccurate duration metadata) fails only that call — the caller
//! drops the corresponding grid slot and continues.

use std::path::Path;

use ffmpeg_next::{
    codec::context::Context as CodecContext,
    format::Pixel,
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::error::SheetError;

/// Capability for decoding a single frame at a timestamp.
///
/// Implementations may call a bound decoding library (the default), shell out
/// to an external tool, or synthesise images in tests.
pub trait FrameExtractor: Send + Sync {
    /// Decode exactly one frame at (or just after) `timestamp_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Extraction`] when the file cannot be opened, has
    /// no video stream, or no frame at or after the timestamp can be decoded.
    fn extract(
        &self,
        path: &Path,
        timestamp_seconds: f64,
    ) -> Result<DynamicImage, SheetError>;
}

/// [`FrameExtractor`] backed by the FFmpeg libraries via `ffmpeg-next`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegFrameExtractor;

impl FfmpegFrameExtractor {
    /// Create a new FFmpeg-backed extractor.
    pub fn new() -> Self {
        Self
    }
}

impl FrameExtractor for FfmpegFrameExtractor {
    fn extract(
        &self,
        path: &Path,
        timestamp_seconds: f64,
    ) -> Result<DynamicImage, SheetError> {
        log::debug!(
            "Extracting frame at {timestamp_seconds:.3}s from {}",
            path.display()
        );

        let extraction_error = |reason: String| SheetError::Extraction {
            path: path.to_path_buf(),
            reason,
        };

        ffmpeg_next::init()
            .map_err(|error| extraction_error(format!("FFmpeg initialisation failed: {error}")))?;

        let mut input_context = ffmpeg_next::format::input(&path)
            .map_err(|error| extraction_error(error.to_string()))?;

        let (video_stream_index, time_base) = {
            let stream = input_context
                .streams()
                .best(Type::Video)
                .ok_or_else(|| extraction_error("no video stream".to_string()))?;
            (stream.index(), stream.time_base())
        };

        // Build a fresh decoder from the stream parameters.
        let codec_parameters = input_context
            .stream(video_stream_index)
            .ok_or_else(|| extraction_error("video stream disappeared".to_string()))?
            .parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)
            .map_err(|error| extraction_error(error.to_string()))?;
        let mut decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| extraction_error(error.to_string()))?;

        let width = decoder.width();
        let height = decoder.height();

        // Pixel-format converter: source format → tightly packed RGB24.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| extraction_error(error.to_string()))?;

        // Seek to the nearest keyframe at or before the target instant.
        // Input-level seeks use AV_TIME_BASE (microsecond) units.
        let target_seconds = timestamp_seconds.max(0.0);
        let seek_target =
            (target_seconds * f64::from(ffmpeg_sys_next::AV_TIME_BASE)) as i64;
        input_context
            .seek(seek_target, ..seek_target)
            .map_err(|error| {
                extraction_error(format!("seek to {target_seconds:.3}s failed: {error}"))
            })?;

        // Decode forward from the keyframe until the stream reaches the
        // target instant, then convert that frame.
        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in input_context.packets() {
            if stream.index() != video_stream_index {
                continue;
            }

            decoder
                .send_packet(&packet)
                .map_err(|error| extraction_error(error.to_string()))?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                let presentation_seconds =
                    pts_to_seconds(decoded_frame.pts().unwrap_or(0), time_base);
                if presentation_seconds >= target_seconds {
                    scaler
                        .run(&decoded_frame, &mut rgb_frame)
                        .map_err(|error| extraction_error(error.to_string()))?;
                    return frame_to_image(&rgb_frame, width, height)
                        .ok_or_else(|| {
                            extraction_error(
                                "decoded frame data did not form a valid image".to_string(),
                            )
                        });
                }
            }
        }

        // Flush the decoder; the target may sit in its internal queue.
        let _ = decoder.send_eof();
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            let presentation_seconds =
                pts_to_seconds(decoded_frame.pts().unwrap_or(0), time_base);
            if presentation_seconds >= target_seconds {
                scaler
                    .run(&decoded_frame, &mut rgb_frame)
                    .map_err(|error| extraction_error(error.to_string()))?;
                return frame_to_image(&rgb_frame, width, height).ok_or_else(|| {
                    extraction_error(
                        "decoded frame data did not form a valid image".to_string(),
                    )
                });
            }
        }

        Err(extraction_error(format!(
            "no decodable frame at or after {target_seconds:.3}s"
        )))
    }
}

/// Rescale a PTS value from the stream time base to seconds.
fn pts_to_seconds(pts: i64, time_base: ffmpeg_next::Rational) -> f64 {
    if time_base.denominator() == 0 {
        return 0.0;
    }
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Convert a packed-RGB FFmpeg frame into an [`image::DynamicImage`].
///
/// FFmpeg frames frequently carry per-row padding (stride > width × 3); the
/// padding is stripped so the buffer can be handed to
/// [`image::RgbImage::from_raw`].
fn frame_to_image(rgb_frame: &VideoFrame, width: u32, height: u32) -> Option<DynamicImage> {
    let stride = rgb_frame.stride(0);
    let expected_stride = (width as usize) * 3;
    let data = rgb_frame.data(0);

    let buffer = if stride == expected_stride {
        data[..expected_stride * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(expected_stride * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + expected_stride]);
        }
        buffer
    };

    RgbImage::from_raw(width, height, buffer).map(DynamicImage::ImageRgb8)
}
