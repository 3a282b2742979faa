// Configuration module
//
// Watermark settings come from an optional YAML file and from CLI flags.
// Both are parsed into the same all-optional `WatermarkConfig`; flags are
// merged over the file, then the result is validated into `WatermarkParams`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WatermarkError};
use crate::watermark::{parse_color, Grid, WatermarkParams};

/// Watermark settings as written in a config file or given on the command line.
///
/// Every field is optional; unset fields fall back to the defaults of
/// [`WatermarkParams`] or to adaptive values.
///
/// ```yaml
/// text: "© ${COMPANY} 2025"
/// rotation: -30
/// color: "#FFFFFF"
/// opacity: 96
/// rows: 3
/// cols: 4
/// output_dir: ./marked
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatermarkConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Degrees, counter-clockwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    /// `#RGB`, `#RRGGBB`, `R,G,B`, `white` or `black`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_factor: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl WatermarkConfig {
    /// Parse YAML, replacing `${VAR_NAME}` with environment variable values.
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| WatermarkError::config(e.to_string()))?;

        // Fail on the first missing variable instead of substituting an empty string
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            if std::env::var(var_name).is_err() {
                return Err(WatermarkError::config(format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )));
            }
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        if substituted.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&substituted)
            .map_err(|e| WatermarkError::config(format!("Invalid config file: {}", e)))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            WatermarkError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_with_env(&yaml)
    }

    /// Overlay `overrides` on `self`; every field set in `overrides` wins.
    pub fn merge(self, overrides: WatermarkConfig) -> WatermarkConfig {
        WatermarkConfig {
            text: overrides.text.or(self.text),
            rotation: overrides.rotation.or(self.rotation),
            color: overrides.color.or(self.color),
            opacity: overrides.opacity.or(self.opacity),
            font_path: overrides.font_path.or(self.font_path),
            font_size: overrides.font_size.or(self.font_size),
            rows: overrides.rows.or(self.rows),
            cols: overrides.cols.or(self.cols),
            spacing_factor: overrides.spacing_factor.or(self.spacing_factor),
            output_dir: overrides.output_dir.or(self.output_dir),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self.text.as_deref() {
            None => {
                return Err(WatermarkError::config(
                    "watermark text is required (use --text or set `text` in the config file)",
                ))
            }
            Some(text) if text.trim().is_empty() => {
                return Err(WatermarkError::config("watermark text cannot be empty"))
            }
            Some(_) => {}
        }

        if self.rows.is_some() != self.cols.is_some() {
            return Err(WatermarkError::config(
                "rows and cols must be given together",
            ));
        }

        if let Some(color) = &self.color {
            parse_color(color)?;
        }

        Ok(())
    }

    /// Validate and convert into immutable watermark parameters.
    pub fn to_params(&self) -> Result<WatermarkParams> {
        self.validate()?;

        let text = self.text.clone().unwrap_or_default();
        let mut builder = WatermarkParams::builder(text)
            .font_path(self.font_path.clone())
            .font_size(self.font_size)
            .spacing_factor(self.spacing_factor);

        if let Some(rotation) = self.rotation {
            builder = builder.rotation_degrees(rotation);
        }
        if let Some(color) = &self.color {
            builder = builder.color(parse_color(color)?);
        }
        if let Some(opacity) = self.opacity {
            builder = builder.opacity(opacity);
        }
        if let (Some(rows), Some(cols)) = (self.rows, self.cols) {
            builder = builder.grid(Grid::Fixed { rows, cols });
        }

        builder.build()
    }
}
