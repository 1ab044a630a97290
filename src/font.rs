//! Font loading for header and timecode text.
//!
//! The sheet composer needs exactly one scalable font. [`SheetFont::load`]
//! tries the explicitly configured font file first and falls back to a scan
//! of well-known system font locations, so the tool works out of the box on
//! Linux, macOS, and Windows without bundling a font resource. No usable
//! font anywhere is a fatal setup error — composition cannot proceed without
//! text rendering.

use std::{fs, path::Path};

use ab_glyph::{FontVec, PxScale};
use imageproc::drawing::text_size;

use crate::error::SheetError;

/// Well-known font file locations, probed in order.
const FALLBACK_FONT_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    // Windows
    "C:/Windows/Fonts/arial.ttf",
    "C:/Windows/Fonts/segoeui.ttf",
];

/// A loaded scalable font shared by the header and timecode overlays.
pub struct SheetFont {
    pub(crate) font: FontVec,
}

impl std::fmt::Debug for SheetFont {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("SheetFont").finish_non_exhaustive()
    }
}

impl SheetFont {
    /// Load a font, preferring `explicit_path` over the system fallbacks.
    ///
    /// An explicit path that fails to load is logged and degrades to the
    /// fallback scan rather than failing outright.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::Setup`] when no usable font file can be found.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, SheetError> {
        if let Some(path) = explicit_path {
            match Self::from_file(path) {
                Some(font) => {
                    log::debug!("Loaded font from {}", path.display());
                    return Ok(Self { font });
                }
                None => {
                    log::warn!(
                        "Could not load font {}; falling back to system fonts",
                        path.display()
                    );
                }
            }
        }

        for candidate in FALLBACK_FONT_PATHS {
            let path = Path::new(candidate);
            if let Some(font) = Self::from_file(path) {
                log::debug!("Loaded fallback font from {candidate}");
                return Ok(Self { font });
            }
        }

        Err(SheetError::Setup {
            reason: "no usable font found (pass --font to point at a .ttf file)".to_string(),
        })
    }

    /// Try to read and parse one font file.
    fn from_file(path: &Path) -> Option<FontVec> {
        let bytes = fs::read(path).ok()?;
        FontVec::try_from_vec(bytes).ok()
    }

    /// Measure the rendered size of `text` at `font_size` pixels.
    ///
    /// Returns `(width, height)` — used to size the timecode overlay boxes.
    pub fn measure(&self, font_size: u32, text: &str) -> (u32, u32) {
        text_size(PxScale::from(font_size as f32), &self.font, text)
    }
}
