// framiq/src/core/mod.rs
pub mod aspect;
pub mod geometry;
pub mod state;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub use aspect::{display_name, AspectPreset, DetectedAspectRatioGroup, ImageSample, PRESETS};
pub use geometry::{compute_layout, Layout};
pub use state::{BatchRunState, CancelToken, RunOutcome, RunStateHandle};

/// Width and height of an image or canvas in pixels, kept as floats so the
/// layout math never truncates until the compositor rounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn from_pixels(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Rounds to whole pixels, never below 1x1.
    pub fn to_pixels(&self) -> (u32, u32) {
        (
            (self.width.round() as u32).max(1),
            (self.height.round() as u32).max(1),
        )
    }
}

/// Shape of a target canvas, e.g. 4:5. Not tied to any image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatioSpec {
    pub width: f64,
    pub height: f64,
}

impl AspectRatioSpec {
    pub fn new(width: f64, height: f64) -> Result<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(FramiqError::InvalidParameter(format!(
                "Aspect ratio sides must be positive, got {}:{}",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    pub fn ratio(&self) -> f64 {
        self.width / self.height
    }

    pub fn display_name(&self) -> String {
        display_name(self.ratio())
    }
}

impl fmt::Display for AspectRatioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

impl FromStr for AspectRatioSpec {
    type Err = FramiqError;

    /// Accepts `W:H`, `WxH` or a preset name such as `square` or `4:5`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Some(preset) = PRESETS
            .iter()
            .find(|p| p.alias.eq_ignore_ascii_case(trimmed))
        {
            return Ok(preset.spec());
        }

        let (w, h) = trimmed
            .split_once(':')
            .or_else(|| trimmed.split_once(['x', 'X']))
            .ok_or_else(|| {
                FramiqError::InvalidParameter(format!(
                    "Invalid aspect ratio '{}', expected W:H",
                    s
                ))
            })?;

        let parse = |v: &str| {
            v.trim().parse::<f64>().map_err(|_| {
                FramiqError::InvalidParameter(format!("Invalid aspect ratio '{}'", s))
            })
        };

        Self::new(parse(w)?, parse(h)?)
    }
}

/// Passepartout size as a percentage of the canvas, 0 to 50 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct BorderPercent(f64);

impl BorderPercent {
    pub const MAX: f64 = 50.0;

    pub fn new(percent: f64) -> Result<Self> {
        if !percent.is_finite() || !(0.0..=Self::MAX).contains(&percent) {
            return Err(FramiqError::InvalidParameter(format!(
                "Border must be between 0 and {}%, got {}",
                Self::MAX,
                percent
            )));
        }
        Ok(Self(percent))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Uniform scale applied to the canvas to get the final canvas.
    pub fn scale_factor(self) -> f64 {
        1.0 + self.0 / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

/// Encoding used for an output file, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Tiff,
    Bmp,
    Gif,
}

impl OutputFormat {
    /// Unknown or missing extensions fall back to JPEG.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match ext.as_deref() {
            Some("png") => OutputFormat::Png,
            Some("tiff") | Some("tif") => OutputFormat::Tiff,
            Some("bmp") => OutputFormat::Bmp,
            Some("gif") => OutputFormat::Gif,
            _ => OutputFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub quality: u8,
    pub algorithm: ResizeAlgorithm,
    pub optimize_png: bool,
    /// 1 processes files strictly in sequence, 0 uses one worker per core.
    pub threads: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            algorithm: ResizeAlgorithm::Lanczos3,
            optimize_png: false,
            threads: 1,
        }
    }
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(FramiqError::InvalidParameter(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        if self.threads > 256 {
            return Err(FramiqError::InvalidParameter(
                "Thread count too large (max 256)".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum FramiqError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cannot decode {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("Cannot write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Processing error: {0}")]
    ProcessingError(String),
}

impl FramiqError {
    pub fn decode(path: &Path, reason: impl ToString) -> Self {
        FramiqError::Decode {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: &Path, reason: impl ToString) -> Self {
        FramiqError::Write {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FramiqError>;
