//! Error types for the `vidsheet` crate.
//!
//! This module defines [`SheetError`], the unified error type returned by all
//! fallible operations in the crate. Variants map directly onto the stages of
//! the sheet pipeline: setup, probing, frame extraction, composition, and
//! persistence.
//!
//! Failures below the level of a single file (one probe field, one frame
//! extraction, one thumbnail paste) are absorbed by the component that
//! encountered them and never surface as a `SheetError` — see the individual
//! module documentation for the degradation rules.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `vidsheet` operations.
///
/// Every public method that can fail returns `Result<T, SheetError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetError {
    /// Process-level setup failed before any file was touched.
    ///
    /// Raised for missing font resources or a worker pool that could not be
    /// built. Setup failures abort the entire run.
    #[error("Setup failed: {reason}")]
    Setup {
        /// What went wrong during setup.
        reason: String,
    },

    /// The media file could not be probed for metadata.
    #[error("Failed to probe {path}: {reason}")]
    Probe {
        /// Path of the file that failed to probe.
        path: PathBuf,
        /// Underlying reason the probe failed.
        reason: String,
    },

    /// No usable frames could be extracted from the file.
    ///
    /// A single frame that fails to extract merely drops its grid slot; this
    /// error is raised when a single extraction call fails in isolation, or by
    /// the pipeline when every sampled timestamp failed.
    #[error("Failed to extract frames from {path}: {reason}")]
    Extraction {
        /// Path of the file that failed.
        path: PathBuf,
        /// Underlying reason extraction failed.
        reason: String,
    },

    /// The contact sheet could not be composed.
    ///
    /// Raised when there are no thumbnails to place, or the grid geometry
    /// degenerates to zero-sized cells.
    #[error("Failed to compose sheet: {reason}")]
    Composition {
        /// Why composition was impossible.
        reason: String,
    },

    /// The composed sheet could not be written to disk.
    #[error("Failed to write sheet to {path}: {reason}")]
    Write {
        /// Destination path of the sheet.
        path: PathBuf,
        /// Underlying reason the write failed.
        reason: String,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate during composition or encoding.
    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),
}
