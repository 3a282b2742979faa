//! Adaptive tile layout for text watermarks.
//!
//! Decides how large the text is and where each copy goes, scaled to the
//! image so a thumbnail and a poster carry a proportionally similar pattern.
//!
//! # Sizing
//!
//! - Font size: measure the text at `min(w, h) / 15`, then scale so the larger
//!   text dimension becomes `min(w, h) / 4`. Never below 10 px.
//! - Spacing factor: `1.8 + 0.4 * min(w, h) / max(w, h)`.
//! - Grid: as many copies of the *rotated* text box (times the spacing factor)
//!   as fit along each axis, clamped to 2..=4.
//!
//! Tiles are centered in equal cells, which leaves a half-cell margin on
//! every edge.
//!
//! # Example
//!
//! ```
//! use tilemark::watermark::font::load_font;
//! use tilemark::watermark::layout::{plan_layout, ImageDimensions};
//! use tilemark::watermark::WatermarkParams;
//!
//! let font = load_font(None);
//! let params = WatermarkParams::builder("© My Company").build().unwrap();
//! let layout = plan_layout(&font.font, &params, ImageDimensions::new(800, 600));
//!
//! assert!(layout.rows >= 2 && layout.cols >= 2);
//! assert_eq!(layout.centers().len(), (layout.rows * layout.cols) as usize);
//! ```

use super::params::{Grid, WatermarkParams};
use super::text_renderer::{measure_text, rotated_size};
use crate::constants::{
    ASPECT_SPACING_FACTOR, BASE_SPACING_FACTOR, INITIAL_SIZE_RATIO, MAX_GRID, MIN_FONT_SIZE,
    MIN_GRID, TARGET_SIZE_RATIO,
};
use ab_glyph::FontArc;

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn short_side(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    fn long_side(&self) -> f32 {
        self.width.max(self.height) as f32
    }
}

/// Top-left corner where a patch is stamped. May be negative; stamping clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i32,
    pub y: i32,
}

impl PlacementPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position that centers a `width` x `height` patch on `center`.
    pub fn centered_on(center: (f32, f32), width: u32, height: u32) -> Self {
        Self::new(
            (center.0 - width as f32 / 2.0).floor() as i32,
            (center.1 - height as f32 / 2.0).floor() as i32,
        )
    }
}

/// Resolved layout for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayout {
    /// Font size in pixels.
    pub font_size: f32,
    /// Unrotated text box (width, height) at `font_size`.
    pub text_size: (u32, u32),
    pub rows: u32,
    pub cols: u32,
    /// Horizontal distance between tile centers.
    pub step_x: f32,
    /// Vertical distance between tile centers.
    pub step_y: f32,
}

impl TileLayout {
    /// Centers of every tile, row by row.
    pub fn centers(&self) -> Vec<(f32, f32)> {
        let mut centers = Vec::with_capacity(self.tile_count());
        for row in 0..self.rows {
            for col in 0..self.cols {
                centers.push((
                    (col as f32 + 0.5) * self.step_x,
                    (row as f32 + 0.5) * self.step_y,
                ));
            }
        }
        centers
    }

    pub fn tile_count(&self) -> usize {
        (self.rows as usize).saturating_mul(self.cols as usize)
    }
}

/// Font size proportional to the image, never below [`MIN_FONT_SIZE`].
pub fn adaptive_font_size(font: &FontArc, text: &str, image: ImageDimensions) -> f32 {
    let short = image.short_side();
    let initial = (short / INITIAL_SIZE_RATIO).floor().max(MIN_FONT_SIZE);

    let (width, height) = measure_text(font, text, initial);
    let largest = width.max(height) as f32;
    if largest <= 0.0 {
        return initial;
    }

    let target = short / TARGET_SIZE_RATIO;
    (initial * target / largest).floor().max(MIN_FONT_SIZE)
}

/// Spacing factor that widens the pattern on square-ish images.
pub fn adaptive_spacing_factor(image: ImageDimensions) -> f32 {
    let long = image.long_side();
    if long <= 0.0 {
        return BASE_SPACING_FACTOR;
    }
    BASE_SPACING_FACTOR + (image.short_side() / long) * ASPECT_SPACING_FACTOR
}

/// Rows and columns that fit the rotated text box, clamped to `MIN_GRID..=MAX_GRID`.
///
/// Returns `(rows, cols)`.
pub fn adaptive_grid(image: ImageDimensions, rotated_text: (f32, f32), spacing: f32) -> (u32, u32) {
    let fit = |extent: u32, size: f32| -> u32 {
        let cell = size * spacing;
        if cell <= 0.0 {
            return MAX_GRID;
        }
        ((extent as f32 / cell).floor() as u32).clamp(MIN_GRID, MAX_GRID)
    };

    (
        fit(image.height, rotated_text.1),
        fit(image.width, rotated_text.0),
    )
}

/// Resolve font size, grid and spacing for one image.
///
/// Explicit values in `params` win over the adaptive ones.
pub fn plan_layout(font: &FontArc, params: &WatermarkParams, image: ImageDimensions) -> TileLayout {
    let font_size = params
        .font_size()
        .unwrap_or_else(|| adaptive_font_size(font, params.text(), image));

    let text_size = measure_text(font, params.text(), font_size);

    let (rows, cols) = match params.grid() {
        // More tiles than pixels along an axis would only restamp the same spots
        Grid::Fixed { rows, cols } => (
            rows.min(image.height.max(1)),
            cols.min(image.width.max(1)),
        ),
        Grid::Auto => {
            let rotated = rotated_size(
                text_size.0 as f32,
                text_size.1 as f32,
                params.rotation_degrees(),
            );
            let spacing = params
                .spacing_factor()
                .unwrap_or_else(|| adaptive_spacing_factor(image));
            adaptive_grid(image, rotated, spacing)
        }
    };

    TileLayout {
        font_size,
        text_size,
        rows,
        cols,
        step_x: image.width as f32 / cols as f32,
        step_y: image.height as f32 / rows as f32,
    }
}
