//! Synthesis constants and per-intensity runtime defaults

use crate::synthesis::profile::Intensity;
use std::time::Duration;

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 1920;
/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 1080;

/// Length of the random alphanumeric file stem
pub const DEFAULT_NAME_LENGTH: usize = 32;

// Density divides canvas size to bound stroke widths and radii
/// Smallest density divisor drawn per synthesis
pub const DENSITY_MIN: u32 = 1;
/// Largest density divisor drawn per synthesis
pub const DENSITY_MAX: u32 = 300;

/// Fewest vertices for multi-vertex shapes
pub const POINTS_MIN: usize = 3;
/// Most vertices for multi-vertex shapes
pub const POINTS_MAX: usize = 10;

/// Floor applied to the stroke width bound on tiny canvases
pub const MIN_STROKE_BOUND: u32 = 2;

// Caps the rounded-rectangle corner fit loop, which has no natural bound
/// Re-sample attempts per axis before the corner radius is clamped
pub const ROUNDED_CORNER_ATTEMPTS: usize = 64;

/// Wall-clock budget for a single filter invocation
pub const DEFAULT_FILTER_DEADLINE: Duration = Duration::from_secs(1);

/// Directory created under the output base for image artifacts
pub const IMAGE_SUBFOLDER: &str = "Images";

/// Keyword of the PNG text chunk carrying the mode tag
pub const PNG_TAG_KEYWORD: &str = "Description";

/// Random stems tried before giving up on a free output name
pub const UNIQUE_NAME_ATTEMPTS: usize = 1024;

/// Upper bounds for the randomized filter arguments
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterLimits {
    /// Largest unsharp-mask percentage
    pub max_percent: u32,
    /// Largest unsharp-mask threshold
    pub max_threshold: u32,
    /// Largest kernel coefficient and number of coefficients
    pub max_kernel: (f32, usize),
    /// Largest kernel divisor
    pub max_scale: f32,
    /// Largest kernel offset
    pub max_offset: f32,
}

impl FilterLimits {
    /// Default limits for an intensity tier
    pub const fn for_intensity(intensity: Intensity) -> Self {
        match intensity {
            Intensity::Light => Self {
                max_percent: 100,
                max_threshold: 100,
                max_kernel: (100.0, 10),
                max_scale: 10.0,
                max_offset: 10.0,
            },
            Intensity::Medium => Self {
                max_percent: 500,
                max_threshold: 500,
                max_kernel: (500.0, 50),
                max_scale: 50.0,
                max_offset: 50.0,
            },
            Intensity::Heavy => Self {
                max_percent: 1000,
                max_threshold: 1000,
                max_kernel: (1000.0, 100),
                max_scale: 100.0,
                max_offset: 100.0,
            },
        }
    }
}
