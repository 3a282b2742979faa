// Error types module

use std::path::PathBuf;
use thiserror::Error;

/// Centralized error type for watermarking.
///
/// `Config` is fatal and raised before any image is opened. The per-file
/// variants (`Decode`, `Encode`, `Io`) are collected by the batch driver and
/// never abort a run on their own.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Missing or invalid parameter (empty text, bad color, unreadable input path, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The file could not be decoded as an image
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    /// The watermarked image could not be encoded or written
    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text could not be rendered
    #[error("Failed to render text watermark: {0}")]
    Render(String),
}

impl WatermarkError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors that must stop the run before processing starts.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, WatermarkError>;
