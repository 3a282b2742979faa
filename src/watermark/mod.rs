//! Tiled text watermarking.
//!
//! Stamps a grid of rotated, semi-transparent copies of a text string over an
//! image. Font size and grid density adapt to the image so small and large
//! images get a visually similar pattern.
//!
//! # Pipeline
//!
//! 1. [`params`] validates the user's choices into an immutable [`WatermarkParams`].
//! 2. [`font`] loads the requested face, falling back to the embedded one.
//! 3. [`layout`] picks font size, grid and tile centers for the image.
//! 4. [`text_renderer`] rasterizes, rotates and colorizes the text once.
//! 5. [`compositor`] stamps the patch at every center and blends it "over" the image.
//!
//! # Example
//!
//! ```
//! use image::{DynamicImage, RgbImage};
//! use tilemark::watermark::{composite, load_font, WatermarkParams};
//!
//! let params = WatermarkParams::builder("Copyright")
//!     .rotation_degrees(45.0)
//!     .opacity(96)
//!     .build()
//!     .unwrap();
//! let font = load_font(params.font_path());
//!
//! let photo = DynamicImage::ImageRgb8(RgbImage::new(640, 480));
//! let marked = composite(&photo, &params, &font.font).unwrap();
//! assert_eq!((marked.width(), marked.height()), (640, 480));
//! ```

pub mod compositor;
pub mod font;
pub mod layout;
pub mod params;
pub mod text_renderer;

// Re-export main types for convenience
pub use compositor::{composite, composite_with_layout, Compositor, WatermarkLayer};
pub use font::{load_font, FontSource, LoadedFont};
pub use layout::{plan_layout, ImageDimensions, PlacementPosition, TileLayout};
pub use params::{Grid, WatermarkParams, WatermarkParamsBuilder};
pub use text_renderer::{parse_color, render_text, Color, TextRenderOptions};
