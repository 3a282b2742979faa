// Tilemark library
// Tiled, rotated, semi-transparent text watermarks for images

pub mod batch;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod watermark;
