//! Text watermark rendering.
//!
//! Text is first rasterized into a single-channel coverage mask, rotated as a
//! mask, then colorized. Keeping coverage separate from color means rotation
//! never bleeds transparent black into the glyph edges, and opacity can scale
//! the anti-aliased coverage instead of replacing it.
//!
//! # Example
//!
//! ```
//! use tilemark::watermark::font::load_font;
//! use tilemark::watermark::text_renderer::{parse_color, render_text, TextRenderOptions};
//!
//! let font = load_font(None);
//! let options = TextRenderOptions {
//!     text: "Copyright 2025".to_string(),
//!     font_size: 24.0,
//!     color: parse_color("#FFFFFF").unwrap(),
//!     opacity: 128,
//!     rotation_degrees: Some(30.0),
//! };
//!
//! let patch = render_text(&font.font, &options).unwrap();
//! assert!(patch.width() > 0);
//! ```

use crate::constants::TEXT_PADDING;
use crate::error::{Result, WatermarkError};
use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};

/// RGB text color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// White color.
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Black color.
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }
}

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct TextRenderOptions {
    /// The text to render.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Text color (RGB).
    pub color: Color,
    /// Opacity (0 to 255), multiplied into the glyph coverage.
    pub opacity: u8,
    /// Rotation in degrees (counter-clockwise). None means no rotation.
    pub rotation_degrees: Option<f32>,
}

/// Parse a color string.
///
/// Accepts `#RGB`, `#RRGGBB`, `R,G,B` with each channel in 0..=255, and the
/// names `white` and `black`. Out-of-range channels are rejected, not clamped.
pub fn parse_color(value: &str) -> Result<Color> {
    let value = value.trim();

    match value.to_ascii_lowercase().as_str() {
        "white" => return Ok(Color::white()),
        "black" => return Ok(Color::black()),
        _ => {}
    }

    if value.starts_with('#') {
        return parse_hex_color(value);
    }

    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(WatermarkError::config(format!(
            "color must be #RGB, #RRGGBB, R,G,B, white or black, got '{}'",
            value
        )));
    }

    let channel = |s: &str| -> Result<u8> {
        s.parse::<u8>().map_err(|_| {
            WatermarkError::config(format!(
                "color channel must be an integer between 0 and 255, got '{}'",
                s
            ))
        })
    };

    Ok(Color::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

/// Parse a hex color string (`#RGB` or `#RRGGBB`) into RGB components.
pub fn parse_hex_color(hex: &str) -> Result<Color> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::config("Color must start with '#'"))?;

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WatermarkError::config(format!(
            "Invalid hex digit in color '#{}'",
            hex
        )));
    }

    let digit = |s: &str| -> Result<u8> {
        u8::from_str_radix(s, 16)
            .map_err(|_| WatermarkError::config(format!("Invalid hex digit '{}'", s)))
    };

    match hex.len() {
        // #RGB: each digit doubled, 0xF -> 0xFF
        3 => Ok(Color::new(
            digit(&hex[0..1])? * 17,
            digit(&hex[1..2])? * 17,
            digit(&hex[2..3])? * 17,
        )),
        6 => Ok(Color::new(
            digit(&hex[0..2])?,
            digit(&hex[2..4])?,
            digit(&hex[4..6])?,
        )),
        _ => Err(WatermarkError::config(format!(
            "Color must be #RGB or #RRGGBB format, got {} characters",
            hex.len()
        ))),
    }
}

/// Calculate the dimensions of rendered text from the font metrics.
///
/// Returns (width, height) in pixels, padding included.
pub fn measure_text(font: &FontArc, text: &str, font_size: f32) -> (u32, u32) {
    let scaled_font = font.as_scaled(PxScale::from(font_size));

    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            width += scaled_font.kern(prev, glyph_id);
        }
        width += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    let height = scaled_font.height();

    (
        (width.max(0.0).ceil() as u32).saturating_add(TEXT_PADDING),
        (height.max(0.0).ceil() as u32).saturating_add(TEXT_PADDING),
    )
}

/// Size of the axis-aligned box enclosing a `width` x `height` box rotated by `degrees`.
pub fn rotated_size(width: f32, height: f32, degrees: f32) -> (f32, f32) {
    let radians = degrees.to_radians();
    let cos = radians.cos().abs();
    let sin = radians.sin().abs();
    (width * cos + height * sin, width * sin + height * cos)
}

/// Rasterize text into a coverage mask (0 = empty, 255 = fully covered).
pub fn render_mask(font: &FontArc, text: &str, font_size: f32) -> GrayImage {
    let scale = PxScale::from(font_size);
    let scaled_font = font.as_scaled(scale);

    let (width, height) = measure_text(font, text, font_size);
    let mut mask = GrayImage::new(width.max(1), height.max(1));

    let offset = (TEXT_PADDING / 2) as f32;
    let baseline_y = offset + scaled_font.ascent();
    let mut cursor_x = offset;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let min_x = bounds.min.x.floor() as i32;
            let min_y = bounds.min.y.floor() as i32;

            outlined.draw(|px, py, coverage| {
                let x = px as i32 + min_x;
                let y = py as i32 + min_y;

                if x >= 0 && y >= 0 && (x as u32) < mask.width() && (y as u32) < mask.height() {
                    let value = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                    let existing = mask.get_pixel(x as u32, y as u32)[0];
                    // Neighbouring glyphs may touch; keep the stronger coverage.
                    mask.put_pixel(x as u32, y as u32, Luma([existing.max(value)]));
                }
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    mask
}

/// Rotate a coverage mask counter-clockwise, expanding the canvas so nothing is clipped.
///
/// Quarter turns are exact pixel transposes; other angles use bilinear
/// sampling with zero coverage outside the source.
pub fn rotate_mask(mask: &GrayImage, degrees: f32) -> GrayImage {
    let degrees = degrees.rem_euclid(360.0);

    if degrees == 0.0 {
        return mask.clone();
    } else if degrees == 90.0 {
        // imageops rotates clockwise
        return imageops::rotate270(mask);
    } else if degrees == 180.0 {
        return imageops::rotate180(mask);
    } else if degrees == 270.0 {
        return imageops::rotate90(mask);
    }

    let radians = degrees.to_radians();
    let cos = radians.cos();
    let sin = radians.sin();

    let src_w = mask.width() as f32;
    let src_h = mask.height() as f32;
    let (rot_w, rot_h) = rotated_size(src_w, src_h, degrees);

    let dst_w = (rot_w.ceil() as u32).max(1);
    let dst_h = (rot_h.ceil() as u32).max(1);
    let mut rotated = GrayImage::new(dst_w, dst_h);

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f32 / 2.0;
    let dst_cy = dst_h as f32 / 2.0;

    let sample = |x: i64, y: i64| -> f32 {
        if x < 0 || y < 0 || x >= mask.width() as i64 || y >= mask.height() as i64 {
            0.0
        } else {
            mask.get_pixel(x as u32, y as u32)[0] as f32
        }
    };

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            // Pixel centers, relative to the destination center
            let rx = dx as f32 + 0.5 - dst_cx;
            let ry = dy as f32 + 0.5 - dst_cy;

            // Inverse of the counter-clockwise rotation (y axis points down)
            let sx = rx * cos - ry * sin + src_cx - 0.5;
            let sy = rx * sin + ry * cos + src_cy - 0.5;

            let x0 = sx.floor();
            let y0 = sy.floor();
            let fx = sx - x0;
            let fy = sy - y0;
            let (x0, y0) = (x0 as i64, y0 as i64);

            let v = sample(x0, y0) * (1.0 - fx) * (1.0 - fy)
                + sample(x0 + 1, y0) * fx * (1.0 - fy)
                + sample(x0, y0 + 1) * (1.0 - fx) * fy
                + sample(x0 + 1, y0 + 1) * fx * fy;

            if v > 0.0 {
                rotated.put_pixel(dx, dy, Luma([v.round().clamp(0.0, 255.0) as u8]));
            }
        }
    }

    rotated
}

/// Turn a coverage mask into an RGBA patch of `color`.
///
/// Alpha is `coverage * opacity / 255`, rounded.
pub fn colorize(mask: &GrayImage, color: Color, opacity: u8) -> RgbaImage {
    let mut patch = RgbaImage::new(mask.width(), mask.height());
    for (x, y, coverage) in mask.enumerate_pixels() {
        let alpha = (coverage[0] as u32 * opacity as u32 + 127) / 255;
        patch.put_pixel(x, y, Rgba([color.r, color.g, color.b, alpha as u8]));
    }
    patch
}

/// Render text to an RGBA patch with a transparent background.
pub fn render_text(font: &FontArc, options: &TextRenderOptions) -> Result<RgbaImage> {
    if options.text.is_empty() {
        return Err(WatermarkError::Render("Cannot render empty text".to_string()));
    }
    if !options.font_size.is_finite() || options.font_size <= 0.0 {
        return Err(WatermarkError::Render(format!(
            "Invalid font size {}",
            options.font_size
        )));
    }

    let mut mask = render_mask(font, &options.text, options.font_size);
    if let Some(degrees) = options.rotation_degrees {
        mask = rotate_mask(&mask, degrees);
    }

    Ok(colorize(&mask, options.color, options.opacity))
}
