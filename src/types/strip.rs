//! Strip scaling parameters.

use std::fmt;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};

/// Resampling kernel for the interior of a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Nearest-neighbour. Never introduces intermediate shades.
    Nearest,
    /// Triangle (bilinear) filter.
    Bilinear,
    /// Lanczos3, the general-purpose quality filter.
    #[default]
    #[serde(alias = "lanczos")]
    Smooth,
}

impl Interpolation {
    pub fn filter(self) -> FilterType {
        match self {
            Interpolation::Nearest => FilterType::Nearest,
            Interpolation::Bilinear => FilterType::Triangle,
            Interpolation::Smooth => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Nearest => write!(f, "nearest"),
            Interpolation::Bilinear => write!(f, "bilinear"),
            Interpolation::Smooth => write!(f, "smooth"),
        }
    }
}

/// Scaling axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// How a strip keeps its frame crisp while it is resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripSpec {
    /// Pixels at each scaled edge that are copied, never resampled.
    #[serde(default = "default_border")]
    pub border_width: u32,
    /// Kernel for the interior.
    #[serde(default)]
    pub interpolation: Interpolation,
}

fn default_border() -> u32 {
    1
}

impl StripSpec {
    pub const fn new(border_width: u32, interpolation: Interpolation) -> Self {
        Self {
            border_width,
            interpolation,
        }
    }

    /// Check that a strip of `length` pixels keeps at least one interior pixel.
    pub fn check_length(&self, length: u32, what: &str) -> Result<()> {
        if length <= self.border_width.saturating_mul(2) {
            return Err(AtlasError::NoInterior {
                border: self.border_width,
                message: format!("{} length {} is too short", what, length),
            });
        }
        Ok(())
    }
}

impl Default for StripSpec {
    fn default() -> Self {
        Self::new(default_border(), Interpolation::default())
    }
}
