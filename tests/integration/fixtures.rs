// Shared helpers for integration tests

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Solid-color RGB image
pub fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
}

/// RGBA image with a horizontal alpha gradient
pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, _| {
        Rgba([0, 128, 255, (x * 255 / width.max(1)) as u8])
    }))
}

/// Write `image` into `dir/name`, format taken from the extension
pub fn write_image(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    let format = ImageFormat::from_path(&path).expect("known extension");
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        ImageFormat::Gif => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => image.clone(),
    };
    image.save_with_format(&path, format).expect("write test image");
    path
}

/// Write bytes that are not a valid image under an image extension
pub fn write_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not an image").expect("write corrupt file");
    path
}

/// Mean absolute per-channel difference between two same-size images
pub fn mean_abs_diff(a: &DynamicImage, b: &DynamicImage) -> f64 {
    let a = a.to_rgba8();
    let b = b.to_rgba8();
    assert_eq!(a.dimensions(), b.dimensions());

    let total: u64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(x, y)| (*x as i32 - *y as i32).unsigned_abs() as u64)
        .sum();
    total as f64 / a.as_raw().len() as f64
}

/// Coordinates of pixels that differ between two same-size images
pub fn changed_pixels(a: &DynamicImage, b: &DynamicImage) -> Vec<(u32, u32)> {
    let a = a.to_rgba8();
    let b = b.to_rgba8();
    a.enumerate_pixels()
        .filter(|(x, y, p)| *p != b.get_pixel(*x, *y))
        .map(|(x, y, _)| (x, y))
        .collect()
}
