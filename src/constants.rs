// Constants module - centralized default values for watermarking
//
// Defaults used by the parameter builder, the adaptive layout and the
// batch driver live here instead of being scattered as magic numbers.

// =============================================================================
// Watermark appearance defaults
// =============================================================================

/// Default rotation angle in degrees
pub const DEFAULT_ROTATION_DEGREES: f32 = 0.0;

/// Default text color (white)
pub const DEFAULT_COLOR: (u8, u8, u8) = (255, 255, 255);

/// Default opacity (0 = invisible, 255 = opaque)
pub const DEFAULT_OPACITY: u8 = 128;

// =============================================================================
// Adaptive layout defaults
// =============================================================================

/// Smallest font size the adaptive layout will pick, in pixels
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Initial font size is `min(width, height) / INITIAL_SIZE_RATIO`
pub const INITIAL_SIZE_RATIO: f32 = 15.0;

/// The larger text dimension targets `min(width, height) / TARGET_SIZE_RATIO`
pub const TARGET_SIZE_RATIO: f32 = 4.0;

/// Minimum number of rows/columns in the adaptive grid
pub const MIN_GRID: u32 = 2;

/// Maximum number of rows/columns in the adaptive grid
pub const MAX_GRID: u32 = 4;

/// Base spacing factor applied to the rotated text box
pub const BASE_SPACING_FACTOR: f32 = 1.8;

/// Extra spacing added in proportion to the image aspect ratio (min/max)
pub const ASPECT_SPACING_FACTOR: f32 = 0.4;

/// Largest explicit font size accepted, in pixels
pub const MAX_FONT_SIZE: f32 = 1000.0;

/// Largest explicit row or column count accepted for a fixed grid
pub const MAX_FIXED_GRID: u32 = 100;

/// Padding added around measured text, in pixels
pub const TEXT_PADDING: u32 = 2;

// =============================================================================
// Batch defaults
// =============================================================================

/// Output subdirectory used when no output directory is given
pub const DEFAULT_OUTPUT_SUBDIR: &str = "watermarked";

/// File extensions (lowercase) picked up from an input directory
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// JPEG encoder quality (1-100)
pub const JPEG_QUALITY: u8 = 90;
