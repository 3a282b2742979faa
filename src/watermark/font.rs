//! Font loading with graceful fallback.
//!
//! A missing or unparsable font file never fails a run. The loader falls
//! back to the embedded DejaVu Sans face and records why, so the caller can
//! emit a warning.

use ab_glyph::FontArc;
use std::fmt;
use std::path::{Path, PathBuf};

/// Embedded default font (DejaVu Sans, Bitstream Vera license, see fonts/LICENSE-DejaVu).
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("fonts/DejaVuSans.ttf");

/// Where the loaded font came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Loaded from the requested file.
    File(PathBuf),
    /// The embedded face. `fallback_reason` is set when a requested file
    /// could not be used.
    Embedded { fallback_reason: Option<String> },
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Embedded { .. } => write!(f, "embedded DejaVu Sans"),
        }
    }
}

/// A font ready for rendering, plus its provenance.
#[derive(Clone)]
pub struct LoadedFont {
    pub font: FontArc,
    pub source: FontSource,
}

impl LoadedFont {
    /// The embedded default face.
    pub fn embedded() -> Self {
        Self {
            font: embedded_font(),
            source: FontSource::Embedded {
                fallback_reason: None,
            },
        }
    }

    /// The reason a requested font was replaced by the embedded one, if any.
    pub fn fallback_reason(&self) -> Option<&str> {
        match &self.source {
            FontSource::Embedded { fallback_reason } => fallback_reason.as_deref(),
            FontSource::File(_) => None,
        }
    }
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("source", &self.source)
            .finish()
    }
}

fn embedded_font() -> FontArc {
    // The embedded bytes are a known-good TrueType file checked in with the crate.
    FontArc::try_from_slice(EMBEDDED_FONT_DATA).expect("embedded font data is valid")
}

/// Load the font at `path`, or the embedded face when `path` is `None`.
///
/// Read or parse failures substitute the embedded face and are reported
/// through [`LoadedFont::fallback_reason`].
pub fn load_font(path: Option<&Path>) -> LoadedFont {
    let Some(path) = path else {
        return LoadedFont::embedded();
    };

    let reason = match std::fs::read(path) {
        Ok(bytes) => match FontArc::try_from_vec(bytes) {
            Ok(font) => {
                return LoadedFont {
                    font,
                    source: FontSource::File(path.to_path_buf()),
                }
            }
            Err(e) => format!("could not parse font {}: {}", path.display(), e),
        },
        Err(e) => format!("could not read font {}: {}", path.display(), e),
    };

    LoadedFont {
        font: embedded_font(),
        source: FontSource::Embedded {
            fallback_reason: Some(reason),
        },
    }
}
