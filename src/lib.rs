//! # vidsheet
//!
//! Generate contact-sheet summary images from video files.
//!
//! A contact sheet is a single still image summarising a video: a metadata
//! header (filename, size, resolution, codec, duration) above a grid of
//! evenly time-spaced frame thumbnails, each stamped with its timecode.
//! Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; composition
//! uses [`image`] and [`imageproc`].
//!
//! ## Quick Start
//!
//! ### One file
//!
//! ```no_run
//! use vidsheet::{
//!     FfmpegFrameExtractor, FfmpegProber, SheetConfig, SheetFont, generate_sheet,
//! };
//!
//! let config = SheetConfig::new();
//! let font = SheetFont::load(None).unwrap();
//! let outcome = generate_sheet(
//!     "input.mp4".as_ref(),
//!     &FfmpegProber::new(),
//!     &FfmpegFrameExtractor::new(),
//!     &font,
//!     &config,
//! )
//! .unwrap();
//! println!("sheet at {}", outcome.sheet_path().display());
//! ```
//!
//! ### A whole directory
//!
//! ```no_run
//! use vidsheet::{
//!     FfmpegFrameExtractor, FfmpegProber, SheetConfig, SheetFont, SilentObserver,
//!     run_batch,
//! };
//!
//! let config = SheetConfig::new().with_workers(4);
//! let font = SheetFont::load(None).unwrap();
//! let report = run_batch(
//!     "/media/videos".as_ref(),
//!     &FfmpegProber::new(),
//!     &FfmpegFrameExtractor::new(),
//!     &font,
//!     &config,
//!     &SilentObserver,
//! )
//! .unwrap();
//! println!("{} ok, {} failed", report.successful, report.failed);
//! ```
//!
//! ## Behaviour
//!
//! - **Gap-padded sampling** — a clip is split into `rows × columns + 2`
//!   equal segments and the interior boundaries are sampled, so the first
//!   and last frames (black frames, logos, cut boundaries) are never chosen.
//! - **Idempotent skip** — a video whose `<stem>_sheet.jpg` already exists
//!   is skipped without probing or decoding anything.
//! - **Failure isolation** — one frame failing to decode drops its grid
//!   slot; one file failing drops that file from the batch; only missing
//!   setup resources (a usable font, the worker pool) abort a run.
//! - **Bounded concurrency** — batch mode processes files across a
//!   fixed-size rayon pool; within one file, work is sequential.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system, plus any
//! TrueType font (or pass one explicitly via
//! [`SheetConfig::with_font_path`]).

pub mod batch;
pub mod compose;
pub mod config;
pub mod error;
pub mod extract;
pub mod font;
pub mod pipeline;
pub mod probe;
pub mod sampling;

pub use batch::{BatchObserver, BatchReport, SilentObserver, find_video_files, is_supported_video, run_batch};
pub use compose::compose_sheet;
pub use config::{SheetConfig, VIDEO_EXTENSIONS};
pub use error::SheetError;
pub use extract::{FfmpegFrameExtractor, FrameExtractor};
pub use font::SheetFont;
pub use pipeline::{SheetOutcome, generate_sheet, sheet_output_path};
pub use probe::{FfmpegProber, MediaProber, VideoInfo};
pub use sampling::{format_timecode, sample_timestamps};
