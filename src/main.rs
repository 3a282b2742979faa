use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tilemark::batch::{run_batch, BatchReport};
use tilemark::config::WatermarkConfig;
use tilemark::logging::LogFormat;

/// Tilemark - tile a rotated, semi-transparent text watermark across images
#[derive(Parser, Debug)]
#[command(name = "tilemark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image file or directory of images
    input: PathBuf,

    /// Output directory [default: <input dir>/watermarked]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Watermark text
    #[arg(short, long)]
    text: Option<String>,

    /// Rotation in degrees, counter-clockwise [default: 0]
    #[arg(short, long, allow_negative_numbers = true)]
    rotation: Option<f32>,

    /// Opacity from 0 (invisible) to 255 (opaque) [default: 128]
    #[arg(long)]
    opacity: Option<u8>,

    /// Text color: #RGB, #RRGGBB, R,G,B, white or black [default: white]
    #[arg(long)]
    color: Option<String>,

    /// TrueType/OpenType font file [default: embedded DejaVu Sans]
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in pixels [default: adaptive]
    #[arg(long)]
    font_size: Option<f32>,

    /// Number of rows; needs cols from the flags or the config file [default: adaptive]
    #[arg(long)]
    rows: Option<u32>,

    /// Number of columns; needs rows from the flags or the config file [default: adaptive]
    #[arg(long)]
    cols: Option<u32>,

    /// Spacing factor applied to the rotated text box [default: adaptive]
    #[arg(long)]
    spacing: Option<f32>,

    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

impl Args {
    /// Settings given on the command line, to be merged over the config file.
    fn overrides(&self) -> WatermarkConfig {
        WatermarkConfig {
            text: self.text.clone(),
            rotation: self.rotation,
            color: self.color.clone(),
            opacity: self.opacity,
            font_path: self.font.clone(),
            font_size: self.font_size,
            rows: self.rows,
            cols: self.cols,
            spacing_factor: self.spacing,
            output_dir: self.output_dir.clone(),
        }
    }
}

fn run(args: &Args) -> anyhow::Result<BatchReport> {
    let file_config = match &args.config {
        Some(path) => {
            let config = WatermarkConfig::from_file(path)?;
            tracing::info!(config_file = %path.display(), "Configuration loaded");
            config
        }
        None => WatermarkConfig::default(),
    };

    let config = file_config.merge(args.overrides());
    let params = config.to_params()?;

    tracing::debug!(
        text = %params.text(),
        rotation = params.rotation_degrees(),
        opacity = params.opacity(),
        grid = ?params.grid(),
        "Watermark parameters resolved"
    );

    let report = run_batch(&args.input, config.output_dir.as_deref(), &params)
        .with_context(|| format!("Failed to watermark {}", args.input.display()))?;
    Ok(report)
}

fn main() {
    let args = Args::parse();

    if let Err(e) = tilemark::logging::init_subscriber(args.log_format) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let report = run(&args).unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    });

    println!(
        "Watermarked {} of {} image(s) into {}",
        report.written.len(),
        report.total(),
        report.output_dir.display()
    );
    for (path, error) in &report.failed {
        println!("  skipped {}: {}", path.display(), error);
    }
}
