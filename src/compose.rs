//! Contact-sheet composition.
//!
//! [`compose_sheet`] takes the probed metadata and the ordered thumbnail
//! sequence for one video and assembles the final raster image: a black
//! sheet of fixed width holding a five-line metadata header on top of a
//! fixed-geometry grid of thumbnails, each stamped with a semi-transparent
//! timecode overlay.
//!
//! Layout rules:
//!
//! - cell width is `(sheet_width − (columns+1)·margin) / columns`;
//! - cell height is the cell width scaled by the aspect ratio of the *first*
//!   thumbnail. Every thumbnail is stretched to that one cell size so the
//!   grid stays uniform even when a frame decodes at an odd resolution;
//! - thumbnails are placed row-major in timestamp order; items beyond
//!   `rows × columns` are ignored, missing trailing items leave blank cells;
//! - a thumbnail that cannot be placed is skipped without aborting the rest.

use std::path::Path;

use ab_glyph::PxScale;
use image::{
    DynamicImage, Rgba, RgbaImage,
    imageops::{self, FilterType},
};
use imageproc::drawing::draw_text_mut;

use crate::{
    config::SheetConfig, error::SheetError, font::SheetFont, probe::VideoInfo,
    sampling::format_timecode,
};

/// Number of metadata lines in the header.
const HEADER_LINES: u32 = 5;
/// Extra pixels reserved below the header lines.
const HEADER_PADDING: u32 = 20;
/// Extra pitch between header lines, beyond the font size.
const HEADER_LINE_GAP: u32 = 2;
/// Gap between the last header line and the first grid row.
const HEADER_GRID_GAP: u32 = 8;
/// Alpha of the timecode overlay box (0 = transparent, 255 = opaque).
const OVERLAY_ALPHA: u8 = 128;
/// Offset of the overlay box from the thumbnail's top-left corner.
const OVERLAY_INSET: i64 = 5;
/// Horizontal padding inside the overlay box around the timecode text.
const OVERLAY_TEXT_PAD_X: u32 = 6;
/// Vertical padding inside the overlay box around the timecode text.
const OVERLAY_TEXT_PAD_Y: u32 = 2;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Compose the contact sheet for one video.
///
/// `thumbnails` is the ordered `(image, timestamp)` sequence produced by the
/// extractor; `info` feeds the header; `video_path` supplies the displayed
/// filename.
///
/// # Errors
///
/// Returns [`SheetError::Composition`] when `thumbnails` is empty or the
/// configured geometry degenerates to zero-sized cells. Individual thumbnails
/// that cannot be placed are skipped, not propagated.
pub fn compose_sheet(
    video_path: &Path,
    thumbnails: &[(DynamicImage, f64)],
    info: &VideoInfo,
    font: &SheetFont,
    config: &SheetConfig,
) -> Result<RgbaImage, SheetError> {
    let Some((first_thumbnail, _)) = thumbnails.first() else {
        return Err(SheetError::Composition {
            reason: "no thumbnails to place".to_string(),
        });
    };

    if config.columns == 0 || config.rows == 0 {
        return Err(SheetError::Composition {
            reason: format!("degenerate grid: {}x{}", config.columns, config.rows),
        });
    }

    let cell_width = cell_width(config.sheet_width, config.columns, config.margin);
    let cell_height = cell_height(cell_width, first_thumbnail.width(), first_thumbnail.height());
    if cell_width == 0 || cell_height == 0 {
        return Err(SheetError::Composition {
            reason: format!("degenerate cell size: {cell_width}x{cell_height}"),
        });
    }

    let total_height = sheet_height(config.header_font_size, config.rows, cell_height, config.margin);
    let grid_top = grid_top(config.margin, config.header_font_size);

    log::debug!(
        "Composing {}x{total_height} sheet ({} thumbnails, cell {cell_width}x{cell_height})",
        config.sheet_width,
        thumbnails.len(),
    );

    let mut sheet = RgbaImage::from_pixel(config.sheet_width, total_height, BLACK);

    draw_header(&mut sheet, video_path, info, font, config);

    let timecode_scale = PxScale::from(config.timecode_font_size as f32);
    let slots = config.thumbnail_count();

    for (index, (image, timestamp_seconds)) in thumbnails.iter().enumerate().take(slots) {
        let column = (index as u32) % config.columns;
        let row = (index as u32) / config.columns;

        let x = i64::from(config.margin + column * (cell_width + config.margin));
        let y = i64::from(grid_top + row * (cell_height + config.margin));

        // A frame that decoded to an empty image cannot be resized; drop the
        // slot and keep going.
        if image.width() == 0 || image.height() == 0 {
            log::warn!(
                "Skipping empty thumbnail {index} for {}",
                video_path.display()
            );
            continue;
        }

        let resized = image
            .resize_exact(cell_width, cell_height, FilterType::Triangle)
            .to_rgba8();
        imageops::overlay(&mut sheet, &resized, x, y);

        // Timecode overlay: a translucent box sized to the text, anchored
        // just inside the thumbnail's top-left corner.
        let timecode = format_timecode(*timestamp_seconds);
        let (text_width, text_height) = font.measure(config.timecode_font_size, &timecode);
        let overlay_box = RgbaImage::from_pixel(
            text_width + OVERLAY_TEXT_PAD_X,
            text_height + OVERLAY_TEXT_PAD_Y,
            Rgba([0, 0, 0, OVERLAY_ALPHA]),
        );
        imageops::overlay(&mut sheet, &overlay_box, x + OVERLAY_INSET, y + OVERLAY_INSET);

        draw_text_mut(
            &mut sheet,
            WHITE,
            (x + OVERLAY_INSET + 3) as i32,
            (y + OVERLAY_INSET) as i32,
            timecode_scale,
            &font.font,
            &timecode,
        );
    }

    Ok(sheet)
}

/// Draw the five metadata lines at the top of the sheet.
fn draw_header(
    sheet: &mut RgbaImage,
    video_path: &Path,
    info: &VideoInfo,
    font: &SheetFont,
    config: &SheetConfig,
) {
    let file_name = video_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| video_path.display().to_string());

    let lines = [
        format!("Filename: {file_name}"),
        format!("Size: {}", info.size_label),
        format!("Resolution: {}", info.resolution),
        format!("Video Codec: {}", info.codec),
        format!("Duration: {}", format_timecode(info.duration_seconds)),
    ];

    let scale = PxScale::from(config.header_font_size as f32);
    let mut y_offset = config.margin;
    for line in &lines {
        draw_text_mut(
            sheet,
            WHITE,
            config.margin as i32,
            y_offset as i32,
            scale,
            &font.font,
            line,
        );
        y_offset += config.header_font_size + HEADER_LINE_GAP;
    }
}

/// Width of one grid cell: the sheet width minus all margins, split evenly.
pub(crate) fn cell_width(sheet_width: u32, columns: u32, margin: u32) -> u32 {
    let total_margin = (columns + 1) * margin;
    sheet_width.saturating_sub(total_margin) / columns
}

/// Height of one grid cell: the cell width scaled by the aspect ratio of the
/// first thumbnail. All cells share this height.
pub(crate) fn cell_height(cell_width: u32, first_width: u32, first_height: u32) -> u32 {
    if first_width == 0 {
        return 0;
    }
    let ratio = first_height as f64 / first_width as f64;
    (cell_width as f64 * ratio) as u32
}

/// Vertical space reserved for the metadata header.
pub(crate) fn header_height(header_font_size: u32) -> u32 {
    HEADER_LINES * header_font_size + HEADER_PADDING
}

/// Y coordinate of the first grid row: below the header lines plus a gap.
pub(crate) fn grid_top(margin: u32, header_font_size: u32) -> u32 {
    margin + HEADER_LINES * (header_font_size + HEADER_LINE_GAP) + HEADER_GRID_GAP
}

/// Total sheet height: header plus grid rows plus the closing margin.
pub(crate) fn sheet_height(
    header_font_size: u32,
    rows: u32,
    cell_height: u32,
    margin: u32,
) -> u32 {
    header_height(header_font_size) + rows * (cell_height + margin) + margin
}
