// Parameter validation tests through the public API

use rstest::rstest;
use tilemark::watermark::{parse_color, Color, Grid, WatermarkParams};

#[rstest]
#[case("#FFF", Color::new(255, 255, 255))]
#[case("#ff8000", Color::new(255, 128, 0))]
#[case("10, 20, 30", Color::new(10, 20, 30))]
#[case("Black", Color::black())]
fn test_color_formats(#[case] input: &str, #[case] expected: Color) {
    assert_eq!(parse_color(input).unwrap(), expected);
}

#[rstest]
#[case("#12")]
#[case("#GGGGGG")]
#[case("256,0,0")]
#[case("1,2")]
#[case("purple")]
fn test_invalid_colors_rejected(#[case] input: &str) {
    assert!(parse_color(input).unwrap_err().is_fatal());
}

#[rstest]
#[case(-90.0, 270.0)]
#[case(720.0, 0.0)]
#[case(30.5, 30.5)]
fn test_rotation_normalization(#[case] input: f32, #[case] expected: f32) {
    let params = WatermarkParams::builder("x")
        .rotation_degrees(input)
        .build()
        .unwrap();
    assert_eq!(params.rotation_degrees(), expected);
}

#[test]
fn test_single_cell_grid_is_valid() {
    let params = WatermarkParams::builder("x")
        .grid(Grid::Fixed { rows: 1, cols: 1 })
        .build()
        .unwrap();
    assert_eq!(params.grid(), Grid::Fixed { rows: 1, cols: 1 });
}
