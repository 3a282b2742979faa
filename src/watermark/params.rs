//! Watermark parameters.
//!
//! `WatermarkParams` is the immutable value handed to the compositor. It is
//! only obtainable through [`WatermarkParamsBuilder::build`], which validates
//! every field, so a compositor never sees empty text or a zero-sized grid.
//!
//! # Example
//!
//! ```
//! use tilemark::watermark::{Color, Grid, WatermarkParams};
//!
//! let params = WatermarkParams::builder("© My Company")
//!     .rotation_degrees(-30.0)
//!     .color(Color::white())
//!     .opacity(128)
//!     .grid(Grid::Fixed { rows: 3, cols: 3 })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(params.rotation_degrees(), 330.0);
//! ```

use super::text_renderer::Color;
use crate::constants::{
    DEFAULT_COLOR, DEFAULT_OPACITY, DEFAULT_ROTATION_DEGREES, MAX_FIXED_GRID, MAX_FONT_SIZE,
};
use crate::error::{Result, WatermarkError};
use std::path::{Path, PathBuf};

/// How many rows and columns of text to tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Grid {
    /// Derived from the image and text dimensions.
    #[default]
    Auto,
    /// Exactly `rows` x `cols` tiles.
    Fixed { rows: u32, cols: u32 },
}

/// Validated, immutable watermark parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct WatermarkParams {
    text: String,
    rotation_degrees: f32,
    color: Color,
    opacity: u8,
    font_path: Option<PathBuf>,
    font_size: Option<f32>,
    grid: Grid,
    spacing_factor: Option<f32>,
}

impl WatermarkParams {
    /// Start building parameters for the given watermark text.
    pub fn builder(text: impl Into<String>) -> WatermarkParamsBuilder {
        WatermarkParamsBuilder::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Rotation in degrees, normalized to `[0, 360)`. Positive is counter-clockwise.
    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn font_path(&self) -> Option<&Path> {
        self.font_path.as_deref()
    }

    /// Explicit font size in pixels, `None` when it is derived per image.
    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn spacing_factor(&self) -> Option<f32> {
        self.spacing_factor
    }
}

/// Builder for [`WatermarkParams`].
#[derive(Debug, Clone)]
pub struct WatermarkParamsBuilder {
    text: String,
    rotation_degrees: f32,
    color: Color,
    opacity: u8,
    font_path: Option<PathBuf>,
    font_size: Option<f32>,
    grid: Grid,
    spacing_factor: Option<f32>,
}

impl WatermarkParamsBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        let (r, g, b) = DEFAULT_COLOR;
        Self {
            text: text.into(),
            rotation_degrees: DEFAULT_ROTATION_DEGREES,
            color: Color::new(r, g, b),
            opacity: DEFAULT_OPACITY,
            font_path: None,
            font_size: None,
            grid: Grid::Auto,
            spacing_factor: None,
        }
    }

    pub fn rotation_degrees(mut self, degrees: f32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn opacity(mut self, opacity: u8) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn font_path(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    pub fn font_size(mut self, size: Option<f32>) -> Self {
        self.font_size = size;
        self
    }

    pub fn grid(mut self, grid: Grid) -> Self {
        self.grid = grid;
        self
    }

    pub fn spacing_factor(mut self, factor: Option<f32>) -> Self {
        self.spacing_factor = factor;
        self
    }

    /// Validate and freeze the parameters.
    pub fn build(self) -> Result<WatermarkParams> {
        if self.text.trim().is_empty() {
            return Err(WatermarkError::config("watermark text cannot be empty"));
        }

        if !self.rotation_degrees.is_finite() {
            return Err(WatermarkError::config(format!(
                "rotation must be a finite number of degrees, got {}",
                self.rotation_degrees
            )));
        }

        if let Some(size) = self.font_size {
            if !size.is_finite() || size <= 0.0 || size > MAX_FONT_SIZE {
                return Err(WatermarkError::config(format!(
                    "font size must be between 0 and {} pixels, got {}",
                    MAX_FONT_SIZE, size
                )));
            }
        }

        if let Grid::Fixed { rows, cols } = self.grid {
            if rows == 0 || cols == 0 {
                return Err(WatermarkError::config(format!(
                    "grid must have at least one row and one column, got {}x{}",
                    rows, cols
                )));
            }
            if rows > MAX_FIXED_GRID || cols > MAX_FIXED_GRID {
                return Err(WatermarkError::config(format!(
                    "grid can have at most {} rows and columns, got {}x{}",
                    MAX_FIXED_GRID, rows, cols
                )));
            }
        }

        if let Some(factor) = self.spacing_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(WatermarkError::config(format!(
                    "spacing factor must be a positive number, got {}",
                    factor
                )));
            }
        }

        // rem_euclid rounds tiny negative angles up to exactly 360
        let mut rotation = self.rotation_degrees.rem_euclid(360.0);
        if rotation >= 360.0 {
            rotation = 0.0;
        }

        Ok(WatermarkParams {
            text: self.text,
            rotation_degrees: rotation,
            color: self.color,
            opacity: self.opacity,
            font_path: self.font_path,
            font_size: self.font_size,
            grid: self.grid,
            spacing_factor: self.spacing_factor,
        })
    }
}
