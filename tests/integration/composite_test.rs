//! Compositor properties on in-memory images.

use super::fixtures::{changed_pixels, gradient_rgba, mean_abs_diff, solid_rgb};
use ab_glyph::FontArc;
use image::DynamicImage;
use rstest::rstest;
use tilemark::watermark::{composite, load_font, Grid, WatermarkParams};

fn font() -> FontArc {
    load_font(None).font
}

fn params(text: &str, opacity: u8, rotation: f32) -> WatermarkParams {
    WatermarkParams::builder(text)
        .opacity(opacity)
        .rotation_degrees(rotation)
        .build()
        .unwrap()
}

/// Fixed 2x2 grid with a fixed font size, so every tile sits well inside its cell
fn boxed_params(text: &str, rotation: f32) -> WatermarkParams {
    WatermarkParams::builder(text)
        .opacity(255)
        .rotation_degrees(rotation)
        .font_size(Some(24.0))
        .grid(Grid::Fixed { rows: 2, cols: 2 })
        .build()
        .unwrap()
}

fn bounding_box(pixels: &[(u32, u32)]) -> (u32, u32) {
    let min_x = pixels.iter().map(|p| p.0).min().unwrap();
    let max_x = pixels.iter().map(|p| p.0).max().unwrap();
    let min_y = pixels.iter().map(|p| p.1).min().unwrap();
    let max_y = pixels.iter().map(|p| p.1).max().unwrap();
    (max_x - min_x + 1, max_y - min_y + 1)
}

#[test]
fn test_single_letter_on_small_image() {
    let source = solid_rgb(100, 100, [30, 30, 30]);
    let result = composite(&source, &params("X", 255, 0.0), &font()).unwrap();

    assert_eq!((result.width(), result.height()), (100, 100));
    assert!(!changed_pixels(&source, &result).is_empty());
}

#[rstest]
#[case(1, 1)]
#[case(640, 480)]
#[case(480, 640)]
#[case(1000, 37)]
fn test_dimensions_preserved(#[case] width: u32, #[case] height: u32) {
    let source = solid_rgb(width, height, [90, 90, 90]);
    let result = composite(&source, &params("© Tilemark", 128, 30.0), &font()).unwrap();
    assert_eq!((result.width(), result.height()), (width, height));
}

#[rstest]
#[case(0.0)]
#[case(45.0)]
#[case(90.0)]
#[case(-30.0)]
#[case(180.0)]
fn test_composite_is_deterministic(#[case] rotation: f32) {
    let source = gradient_rgba(300, 200);
    let font = font();
    let params = params("Deterministic", 160, rotation);

    let first = composite(&source, &params, &font).unwrap();
    let second = composite(&source, &params, &font).unwrap();
    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_source_is_not_modified() {
    let source = gradient_rgba(256, 128);
    let snapshot = source.as_bytes().to_vec();

    let _ = composite(&source, &params("Read only", 255, 15.0), &font()).unwrap();
    assert_eq!(source.as_bytes(), snapshot.as_slice());
}

#[test]
fn test_opacity_is_monotonic() {
    let source = solid_rgb(240, 240, [40, 60, 80]);
    let font = font();

    let diffs: Vec<f64> = [0u8, 64, 128, 192, 255]
        .iter()
        .map(|&opacity| {
            let result = composite(&source, &params("Sample", opacity, 30.0), &font).unwrap();
            mean_abs_diff(&source, &result)
        })
        .collect();

    assert_eq!(diffs[0], 0.0);
    for pair in diffs.windows(2) {
        assert!(pair[1] > pair[0], "diffs not increasing: {:?}", diffs);
    }
}

#[rstest]
#[case(solid_rgb(120, 90, [10, 20, 30]))]
#[case(gradient_rgba(120, 90))]
fn test_zero_opacity_is_identity(#[case] source: DynamicImage) {
    let result = composite(&source, &params("Ghost", 0, 60.0), &font()).unwrap();
    assert_eq!(result.color(), source.color());
    assert_eq!(result.as_bytes(), source.as_bytes());
}

#[test]
fn test_rotation_zero_is_axis_aligned() {
    // 400x400 with a 2x2 grid: the top-left cell holds exactly one tile
    let source = solid_rgb(400, 400, [0, 0, 0]);
    let result = composite(&source, &boxed_params("WWWW", 0.0), &font()).unwrap();

    let tile: Vec<_> = changed_pixels(&source, &result)
        .into_iter()
        .filter(|(x, y)| *x < 200 && *y < 200)
        .collect();
    let (width, height) = bounding_box(&tile);
    assert!(width > height * 2, "expected a wide tile, got {}x{}", width, height);
}

#[test]
fn test_quarter_turn_keeps_coverage() {
    let source = solid_rgb(400, 400, [0, 0, 0]);
    let font = font();

    let flat = composite(&source, &boxed_params("WWWW", 0.0), &font).unwrap();
    let upright = composite(&source, &boxed_params("WWWW", 90.0), &font).unwrap();

    let flat_pixels = changed_pixels(&source, &flat);
    let upright_pixels = changed_pixels(&source, &upright);
    assert_eq!(flat_pixels.len(), upright_pixels.len());

    let tile: Vec<_> = upright_pixels
        .into_iter()
        .filter(|(x, y)| *x < 200 && *y < 200)
        .collect();
    let (width, height) = bounding_box(&tile);
    assert!(height > width * 2, "expected a tall tile, got {}x{}", width, height);
}

#[rstest]
#[case(30.0)]
#[case(-45.0)]
#[case(135.0)]
fn test_arbitrary_rotation_marks_image(#[case] rotation: f32) {
    let source = solid_rgb(320, 240, [200, 200, 200]);
    let params = WatermarkParams::builder("Rotated")
        .rotation_degrees(rotation)
        .opacity(255)
        .color(tilemark::watermark::Color::black())
        .build()
        .unwrap();

    let result = composite(&source, &params, &font()).unwrap();
    assert!(mean_abs_diff(&source, &result) > 0.0);
}

#[test]
fn test_transparent_regions_stay_transparent() {
    let source = DynamicImage::ImageRgba8(image::RgbaImage::new(200, 200));
    let result = composite(&source, &params("Alpha", 255, 0.0), &font()).unwrap();

    let rgba = result.to_rgba8();
    assert_eq!(rgba.get_pixel(0, 0)[3], 0);
    assert!(rgba.pixels().any(|p| p[3] > 200));
}
