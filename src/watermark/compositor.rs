//! Watermark compositor for blending tiled text onto images.
//!
//! The text patch is rendered once, stamped at every tile center onto a
//! transparent overlay, and the overlay is then blended onto an RGBA copy of
//! the source with the Porter-Duff "over" operator.
//!
//! # Alpha handling
//!
//! Sources without an alpha channel come back as opaque RGB8. Sources with
//! alpha keep it and come back as RGBA8. The caller's image is never
//! modified.
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use tilemark::watermark::{composite, font::load_font, WatermarkParams};
//!
//! let source = DynamicImage::ImageRgb8(RgbImage::new(320, 240));
//! let params = WatermarkParams::builder("© My Company")
//!     .rotation_degrees(-30.0)
//!     .build()
//!     .unwrap();
//!
//! let font = load_font(None);
//! let marked = composite(&source, &params, &font.font).unwrap();
//! assert_eq!((marked.width(), marked.height()), (320, 240));
//! ```

use super::layout::{plan_layout, ImageDimensions, PlacementPosition, TileLayout};
use super::params::WatermarkParams;
use super::text_renderer::{render_text, TextRenderOptions};
use crate::error::Result;
use ab_glyph::FontArc;
use image::{DynamicImage, Rgba, RgbaImage};
use std::rc::Rc;

/// A patch to be stamped at a position.
#[derive(Clone)]
pub struct WatermarkLayer {
    /// The patch (RGBA). Shared between tiles.
    pub image: Rc<RgbaImage>,
    /// Top-left corner on the target.
    pub position: PlacementPosition,
}

impl std::fmt::Debug for WatermarkLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatermarkLayer")
            .field("dimensions", &(self.image.width(), self.image.height()))
            .field("position", &self.position)
            .finish()
    }
}

/// Ordered stack of layers applied with "over" blending.
#[derive(Debug, Default)]
pub struct Compositor {
    layers: Vec<WatermarkLayer>,
}

impl Compositor {
    /// Create a new compositor with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a watermark layer to the compositor.
    pub fn add_layer(&mut self, layer: WatermarkLayer) {
        self.layers.push(layer);
    }

    /// Apply all layers to the target, in the order they were added.
    pub fn apply(&self, target: &mut RgbaImage) {
        for layer in &self.layers {
            blend_onto(target, &layer.image, layer.position);
        }
    }

    /// Get the number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Blend `source` onto `target` with its top-left corner at `position`.
///
/// Parts of `source` outside the target are clipped.
pub fn blend_onto(target: &mut RgbaImage, source: &RgbaImage, position: PlacementPosition) {
    let target_width = target.width() as i64;
    let target_height = target.height() as i64;

    let (px, py) = (position.x as i64, position.y as i64);
    let x_start = px.max(0);
    let y_start = py.max(0);
    let x_end = (px + source.width() as i64).min(target_width);
    let y_end = (py + source.height() as i64).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let src = *source.get_pixel((tx - px) as u32, (ty - py) as u32);
            let dst = target.get_pixel_mut(tx as u32, ty as u32);
            *dst = blend_pixels(*dst, src);
        }
    }
}

/// Porter-Duff "over": result = foreground + background * (1 - foreground.alpha)
///
/// A fully transparent foreground leaves the background bit-exact.
fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    match foreground[3] {
        0 => return background,
        255 => return foreground,
        _ => {}
    }

    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;
    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let result = (fg as f32 * fg_alpha + bg as f32 * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        result.round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

/// One layer per tile center, all sharing `patch`.
pub fn create_tiled_layers(patch: RgbaImage, layout: &TileLayout) -> Vec<WatermarkLayer> {
    let patch = Rc::new(patch);
    layout
        .centers()
        .into_iter()
        .map(|center| WatermarkLayer {
            position: PlacementPosition::centered_on(center, patch.width(), patch.height()),
            image: Rc::clone(&patch),
        })
        .collect()
}

/// Render the transparent overlay holding every tile, same size as the image.
pub fn build_overlay(
    font: &FontArc,
    params: &WatermarkParams,
    layout: &TileLayout,
    image: ImageDimensions,
) -> Result<RgbaImage> {
    let rotation = params.rotation_degrees();
    let patch = render_text(
        font,
        &TextRenderOptions {
            text: params.text().to_string(),
            font_size: layout.font_size,
            color: params.color(),
            opacity: params.opacity(),
            rotation_degrees: (rotation != 0.0).then_some(rotation),
        },
    )?;

    let mut compositor = Compositor::new();
    for layer in create_tiled_layers(patch, layout) {
        compositor.add_layer(layer);
    }

    let mut overlay = RgbaImage::new(image.width, image.height);
    compositor.apply(&mut overlay);
    Ok(overlay)
}

/// Watermark `image` using an already planned layout.
pub fn composite_with_layout(
    image: &DynamicImage,
    params: &WatermarkParams,
    font: &FontArc,
    layout: &TileLayout,
) -> Result<DynamicImage> {
    let has_alpha = image.color().has_alpha();
    let mut base = image.to_rgba8();

    if params.opacity() > 0 && base.width() > 0 && base.height() > 0 {
        let dims = ImageDimensions::new(base.width(), base.height());
        let overlay = build_overlay(font, params, layout, dims)?;
        blend_onto(&mut base, &overlay, PlacementPosition::new(0, 0));
    }

    let rgba = DynamicImage::ImageRgba8(base);
    if has_alpha {
        Ok(rgba)
    } else {
        Ok(DynamicImage::ImageRgb8(rgba.to_rgb8()))
    }
}

/// Watermark `image` with a tiled, rotated, translucent copy of the text.
///
/// Font size and grid are planned from the image size unless fixed in
/// `params`. Returns a new image with the same dimensions.
pub fn composite(image: &DynamicImage, params: &WatermarkParams, font: &FontArc) -> Result<DynamicImage> {
    let dims = ImageDimensions::new(image.width(), image.height());
    let layout = plan_layout(font, params, dims);
    composite_with_layout(image, params, font, &layout)
}
