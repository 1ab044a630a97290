//! Sheet generation configuration.
//!
//! [`SheetConfig`] gathers every tunable of the pipeline — sheet geometry,
//! font sizes, JPEG quality, and worker count — into a single immutable value
//! constructed once at startup and passed by reference into the composer and
//! orchestrator. There is no process-wide mutable configuration.

use std::path::PathBuf;

/// File extensions (lowercase, without the dot) treated as video inputs.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "3gp",
];

/// Configuration for contact-sheet generation.
///
/// Controls sheet geometry, grid layout, output quality, and batch
/// parallelism. Construct with [`SheetConfig::new`] (or `Default`) and refine
/// with the `with_*` builder methods.
///
/// # Example
///
/// ```
/// use vidsheet::SheetConfig;
///
/// let config = SheetConfig::new()
///     .with_grid(4, 4)
///     .with_sheet_width(1280)
///     .with_workers(2);
/// assert_eq!(config.thumbnail_count(), 16);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct SheetConfig {
    /// Total width of the composed sheet in pixels.
    pub sheet_width: u32,
    /// Number of thumbnail columns in the grid.
    pub columns: u32,
    /// Number of thumbnail rows in the grid.
    pub rows: u32,
    /// Margin in pixels between grid cells and at the sheet edges.
    pub margin: u32,
    /// JPEG quality (1–100) for the persisted sheet.
    pub jpeg_quality: u8,
    /// Font size in pixels for the metadata header lines.
    pub header_font_size: u32,
    /// Font size in pixels for the per-thumbnail timecode overlays.
    pub timecode_font_size: u32,
    /// Number of files processed concurrently in batch mode.
    pub workers: usize,
    /// Explicit font file to use. When `None`, or when the file cannot be
    /// loaded, well-known system font locations are scanned instead.
    pub font_path: Option<PathBuf>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_width: 1920,
            columns: 5,
            rows: 5,
            margin: 5,
            jpeg_quality: 90,
            header_font_size: 22,
            timecode_font_size: 18,
            workers: 4,
            font_path: None,
        }
    }
}

impl SheetConfig {
    /// Create a configuration with the default 5×5 grid at 1920 px width.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grid geometry.
    pub fn with_grid(mut self, columns: u32, rows: u32) -> Self {
        self.columns = columns;
        self.rows = rows;
        self
    }

    /// Set the total sheet width in pixels.
    pub fn with_sheet_width(mut self, width: u32) -> Self {
        self.sheet_width = width;
        self
    }

    /// Set the worker count for batch processing.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set an explicit font file for header and timecode text.
    pub fn with_font_path(mut self, path: PathBuf) -> Self {
        self.font_path = Some(path);
        self
    }

    /// Number of thumbnails on a full sheet (`rows × columns`).
    pub fn thumbnail_count(&self) -> usize {
        (self.rows as usize) * (self.columns as usize)
    }
}
