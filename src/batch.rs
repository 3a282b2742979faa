// Batch module - watermark every image in a file or directory
//
// Configuration problems (bad input path, output directory equal to the
// input directory) abort before any image is opened. Per-file problems are
// logged and collected in the report; the batch always runs to the end.

use crate::constants::{DEFAULT_OUTPUT_SUBDIR, IMAGE_EXTENSIONS, JPEG_QUALITY};
use crate::error::{Result, WatermarkError};
use crate::watermark::{composite, load_font, WatermarkParams};
use ab_glyph::FontArc;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::io::Reader as ImageReader;
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Directory the outputs were written to.
    pub output_dir: PathBuf,
    /// Outputs written, in processing order.
    pub written: Vec<PathBuf>,
    /// Inputs that failed, with the reason.
    pub failed: Vec<(PathBuf, WatermarkError)>,
    /// Set when the requested font could not be used.
    pub font_fallback: Option<String>,
}

impl BatchReport {
    /// Number of images attempted.
    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Whether `path` has one of the supported image extensions (case-insensitive).
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List the images to process, sorted by path.
///
/// A file input yields itself. A directory yields its supported images,
/// without descending into subdirectories.
pub fn discover_images(input: &Path) -> Result<Vec<PathBuf>> {
    if !input.exists() {
        return Err(WatermarkError::config(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    if input.is_file() {
        if !is_supported_image(input) {
            return Err(WatermarkError::config(format!(
                "unsupported image type: {} (expected one of {})",
                input.display(),
                IMAGE_EXTENSIONS.join(", ")
            )));
        }
        return Ok(vec![input.to_path_buf()]);
    }

    let entries = fs::read_dir(input).map_err(|e| {
        WatermarkError::config(format!(
            "cannot read input directory {}: {}",
            input.display(),
            e
        ))
    })?;

    let mut images: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    images.sort();
    Ok(images)
}

/// Directory holding the input image(s).
fn input_dir(input: &Path) -> PathBuf {
    if input.is_dir() {
        return input.to_path_buf();
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Resolve the output directory and refuse one that would overwrite the originals.
///
/// Defaults to `watermarked/` next to the input image(s). Does not create it.
pub fn resolve_output_dir(input: &Path, output_dir: Option<&Path>) -> Result<PathBuf> {
    let source_dir = input_dir(input);
    let resolved = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => source_dir.join(DEFAULT_OUTPUT_SUBDIR),
    };

    // An output directory that does not exist yet cannot be the input one
    if let (Ok(out), Ok(src)) = (resolved.canonicalize(), source_dir.canonicalize()) {
        if out == src {
            return Err(WatermarkError::config(format!(
                "output directory {} is the input directory; originals would be overwritten",
                resolved.display()
            )));
        }
    }

    Ok(resolved)
}

/// Encode `image` to `path`, choosing the encoder from the file extension.
///
/// JPEG has no alpha channel, so JPEG outputs are always flattened to RGB.
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    let encode_error = |message: String| WatermarkError::Encode {
        path: path.to_path_buf(),
        message,
    };

    let format = ImageFormat::from_path(path).map_err(|e| encode_error(e.to_string()))?;
    let file = File::create(path).map_err(|source| WatermarkError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let (width, height) = (image.width(), image.height());

    let encoded = match format {
        ImageFormat::Jpeg => {
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY).write_image(
                rgb.as_raw(),
                width,
                height,
                ColorType::Rgb8,
            )
        }
        ImageFormat::Png => {
            PngEncoder::new(&mut writer).write_image(image.as_bytes(), width, height, image.color())
        }
        ImageFormat::WebP => {
            // The pure-Rust WebP encoder is lossless only
            let rgba = image.to_rgba8();
            WebPEncoder::new_lossless(&mut writer).write_image(
                rgba.as_raw(),
                width,
                height,
                ColorType::Rgba8,
            )
        }
        ImageFormat::Gif => {
            let rgba = image.to_rgba8();
            GifEncoder::new(&mut writer).encode(rgba.as_raw(), width, height, ColorType::Rgba8)
        }
        other => {
            drop(writer);
            let _ = fs::remove_file(path);
            return Err(encode_error(format!("unsupported output format {:?}", other)));
        }
    };

    if let Err(e) = encoded {
        drop(writer);
        let _ = fs::remove_file(path);
        return Err(encode_error(e.to_string()));
    }

    writer.flush().map_err(|source| WatermarkError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode, watermark and save a single image. Returns the output path.
pub fn process_file(
    input: &Path,
    output_dir: &Path,
    params: &WatermarkParams,
    font: &FontArc,
) -> Result<PathBuf> {
    let file_name = input.file_name().ok_or_else(|| WatermarkError::Decode {
        path: input.to_path_buf(),
        message: "path has no file name".to_string(),
    })?;
    let output = output_dir.join(file_name);

    let decode_error = |message: String| WatermarkError::Decode {
        path: input.to_path_buf(),
        message,
    };

    // Sniff the format from the bytes; extensions are only a discovery filter
    let source = ImageReader::open(input)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| decode_error(e.to_string()))?
        .decode()
        .map_err(|e| decode_error(e.to_string()))?;

    let marked = composite(&source, params, font)?;
    save_image(&marked, &output)?;
    Ok(output)
}

/// Watermark every image under `input` into `output_dir`.
///
/// Returns `Err` only for configuration problems detected up front (and for
/// failing to create the output directory). Per-file failures are in the
/// report.
pub fn run_batch(
    input: &Path,
    output_dir: Option<&Path>,
    params: &WatermarkParams,
) -> Result<BatchReport> {
    let images = discover_images(input)?;
    let output_dir = resolve_output_dir(input, output_dir)?;

    let mut report = BatchReport {
        output_dir: output_dir.clone(),
        ..Default::default()
    };

    if images.is_empty() {
        tracing::warn!(input = %input.display(), "No image files found");
        return Ok(report);
    }

    fs::create_dir_all(&output_dir).map_err(|source| WatermarkError::Io {
        path: output_dir.clone(),
        source,
    })?;

    let font = load_font(params.font_path());
    if let Some(reason) = font.fallback_reason() {
        tracing::warn!(reason = %reason, "Falling back to embedded font");
        report.font_fallback = Some(reason.to_string());
    }

    tracing::info!(
        count = images.len(),
        input = %input.display(),
        output_dir = %output_dir.display(),
        font = %font.source,
        "Found images to process"
    );

    for path in images {
        match process_file(&path, &output_dir, params, &font.font) {
            Ok(written) => {
                tracing::info!(input = %path.display(), output = %written.display(), "Saved watermarked image");
                report.written.push(written);
            }
            Err(e) => {
                tracing::error!(input = %path.display(), error = %e, "Failed to watermark image");
                report.failed.push((path, e));
            }
        }
    }

    tracing::info!(
        written = report.written.len(),
        failed = report.failed.len(),
        "Batch complete"
    );

    Ok(report)
}
