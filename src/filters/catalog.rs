//! Filter catalog, randomized argument bundles and typed filter specs

use crate::io::configuration::FilterLimits;
use crate::io::error::{PoisonError, Result};
use crate::math::probability::{uniform, uniform_inclusive};
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Whole-image filters available to the pipeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// 5x5 ring blur
    Blur,
    /// Contour extraction
    Contour,
    /// Detail enhancement
    Detail,
    /// Mild edge enhancement
    EdgeEnhance,
    /// Strong edge enhancement
    EdgeEnhanceMore,
    /// Emboss relief
    Emboss,
    /// Edge detection
    FindEdges,
    /// Sharpening
    Sharpen,
    /// 3x3 smoothing
    Smooth,
    /// 5x5 smoothing
    SmoothMore,
    /// Box blur with a sampled radius
    BoxBlur,
    /// Gaussian blur with a sampled radius
    GaussianBlur,
    /// Unsharp mask with sampled radius, percent and threshold
    UnsharpMask,
    /// Custom convolution with sampled coefficients
    Kernel,
    /// Rank filter with sampled window and rank
    RankFilter,
    /// Median of a sampled window
    MedianFilter,
    /// Minimum of a sampled window
    MinFilter,
    /// Maximum of a sampled window
    MaxFilter,
    /// Most frequent value of a sampled window
    ModeFilter,
}

impl FilterKind {
    /// The full built-in catalog
    pub const ALL: [Self; 19] = [
        Self::Blur,
        Self::Contour,
        Self::Detail,
        Self::EdgeEnhance,
        Self::EdgeEnhanceMore,
        Self::Emboss,
        Self::FindEdges,
        Self::Sharpen,
        Self::Smooth,
        Self::SmoothMore,
        Self::BoxBlur,
        Self::GaussianBlur,
        Self::UnsharpMask,
        Self::Kernel,
        Self::RankFilter,
        Self::MedianFilter,
        Self::MinFilter,
        Self::MaxFilter,
        Self::ModeFilter,
    ];

    /// Rank-order filters, slow on large windows
    pub const RANK_ORDER: [Self; 5] = [
        Self::RankFilter,
        Self::MedianFilter,
        Self::MinFilter,
        Self::MaxFilter,
        Self::ModeFilter,
    ];

    /// Catalog name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Blur => "blur",
            Self::Contour => "contour",
            Self::Detail => "detail",
            Self::EdgeEnhance => "edge_enhance",
            Self::EdgeEnhanceMore => "edge_enhance_more",
            Self::Emboss => "emboss",
            Self::FindEdges => "find_edges",
            Self::Sharpen => "sharpen",
            Self::Smooth => "smooth",
            Self::SmoothMore => "smooth_more",
            Self::BoxBlur => "box_blur",
            Self::GaussianBlur => "gaussian_blur",
            Self::UnsharpMask => "unsharp_mask",
            Self::Kernel => "kernel",
            Self::RankFilter => "rank_filter",
            Self::MedianFilter => "median_filter",
            Self::MinFilter => "min_filter",
            Self::MaxFilter => "max_filter",
            Self::ModeFilter => "mode_filter",
        }
    }

    /// Whether the filter takes no sampled arguments
    pub const fn is_parameterless(self) -> bool {
        matches!(
            self,
            Self::Blur
                | Self::Contour
                | Self::Detail
                | Self::EdgeEnhance
                | Self::EdgeEnhanceMore
                | Self::Emboss
                | Self::FindEdges
                | Self::Sharpen
                | Self::Smooth
                | Self::SmoothMore
        )
    }

    /// Whether the filter orders window samples
    pub const fn is_rank_order(self) -> bool {
        matches!(
            self,
            Self::RankFilter
                | Self::MedianFilter
                | Self::MinFilter
                | Self::MaxFilter
                | Self::ModeFilter
        )
    }
}

// Lowercase with separators removed, so "GaussianBlur" and "gaussian_blur" agree
fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for FilterKind {
    type Err = PoisonError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = squash(s);
        Self::ALL
            .into_iter()
            .find(|kind| squash(kind.name()) == wanted)
            .ok_or_else(|| PoisonError::UnsupportedFilter {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Randomized numeric arguments drawn once per filter instance
///
/// Each filter kind reads only the fields relevant to it.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterArgs {
    /// Blur radius
    pub radius: f32,
    /// Unsharp-mask strength in percent
    pub percent: u32,
    /// Unsharp-mask threshold
    pub threshold: u32,
    /// Convolution coefficients
    pub kernel: Vec<f32>,
    /// Convolution divisor
    pub scale: f32,
    /// Convolution offset
    pub offset: f32,
    /// Rank within the window
    pub rank: usize,
    /// Window size and secondary extent
    pub size: (u32, u32),
}

impl FilterArgs {
    /// Draw a fresh argument bundle for a canvas
    pub fn sample<R: Rng + ?Sized>(
        height: u32,
        width: u32,
        density: u32,
        limits: &FilterLimits,
        rng: &mut R,
    ) -> Self {
        let shorter = height.min(width);
        let (max_coefficient, coefficients) = limits.max_kernel;

        Self {
            radius: uniform(rng, 1.0, f64::from(shorter)) as f32,
            percent: uniform_inclusive(rng, 0, limits.max_percent),
            threshold: uniform_inclusive(rng, 0, limits.max_threshold),
            kernel: (0..coefficients)
                .map(|_| uniform(rng, 0.0, f64::from(max_coefficient)) as f32)
                .collect(),
            scale: uniform(rng, 1.0, f64::from(limits.max_scale)) as f32,
            offset: uniform(rng, 0.0, f64::from(limits.max_offset)) as f32,
            rank: uniform_inclusive(rng, 0, (shorter / 4) as usize),
            size: (
                uniform_inclusive(rng, 10, (height / 4).max(11)),
                uniform_inclusive(rng, 1, (width / density.max(1)).max(2)),
            ),
        }
    }
}

/// One filter instance with exactly the arguments its kind uses
#[derive(Clone, Debug, PartialEq)]
pub enum FilterSpec {
    /// Fixed-kernel convolution
    Fixed(FilterKind),
    /// Separable box blur
    BoxBlur {
        /// Half-width of the box
        radius: f32,
    },
    /// Gaussian blur approximated by repeated box blurs
    GaussianBlur {
        /// Standard deviation
        radius: f32,
    },
    /// Unsharp mask
    UnsharpMask {
        /// Blur standard deviation
        radius: f32,
        /// Strength in percent
        percent: u32,
        /// Minimum difference that gets sharpened
        threshold: u32,
    },
    /// Custom convolution
    Kernel {
        /// Kernel side, 3 or 5
        side: usize,
        /// Row-major coefficients, `side * side` long
        weights: Vec<f32>,
        /// Divisor applied to the weighted sum
        scale: f32,
        /// Offset added after division
        offset: f32,
    },
    /// Pick the value at `rank` of the sorted window
    Rank {
        /// Odd window side
        size: u32,
        /// Zero-based rank, below `size * size`
        rank: usize,
    },
    /// Window median
    Median {
        /// Odd window side
        size: u32,
    },
    /// Window minimum
    Min {
        /// Odd window side
        size: u32,
    },
    /// Window maximum
    Max {
        /// Odd window side
        size: u32,
    },
    /// Window mode
    Mode {
        /// Odd window side
        size: u32,
    },
}

impl FilterSpec {
    /// Bind a kind to the relevant subset of an argument bundle
    pub fn from_args(kind: FilterKind, args: &FilterArgs) -> Self {
        // Rank windows need a centre pixel
        let window = args.size.0.max(1) | 1;
        let window_area = (window as usize).saturating_mul(window as usize);

        match kind {
            FilterKind::BoxBlur => Self::BoxBlur {
                radius: args.radius,
            },
            FilterKind::GaussianBlur => Self::GaussianBlur {
                radius: args.radius,
            },
            FilterKind::UnsharpMask => Self::UnsharpMask {
                radius: args.radius,
                percent: args.percent,
                threshold: args.threshold,
            },
            FilterKind::Kernel => {
                let side = if args.kernel.len() >= 25 { 5 } else { 3 };
                let mut weights: Vec<f32> = args.kernel.iter().copied().take(side * side).collect();
                weights.resize(side * side, 0.0);
                Self::Kernel {
                    side,
                    weights,
                    scale: args.scale,
                    offset: args.offset,
                }
            }
            FilterKind::RankFilter => Self::Rank {
                size: window,
                rank: args.rank.min(window_area.saturating_sub(1)),
            },
            FilterKind::MedianFilter => Self::Median { size: window },
            FilterKind::MinFilter => Self::Min { size: window },
            FilterKind::MaxFilter => Self::Max { size: window },
            FilterKind::ModeFilter => Self::Mode { size: window },
            fixed => Self::Fixed(fixed),
        }
    }

    /// Kind of this instance
    pub const fn kind(&self) -> FilterKind {
        match self {
            Self::Fixed(kind) => *kind,
            Self::BoxBlur { .. } => FilterKind::BoxBlur,
            Self::GaussianBlur { .. } => FilterKind::GaussianBlur,
            Self::UnsharpMask { .. } => FilterKind::UnsharpMask,
            Self::Kernel { .. } => FilterKind::Kernel,
            Self::Rank { .. } => FilterKind::RankFilter,
            Self::Median { .. } => FilterKind::MedianFilter,
            Self::Min { .. } => FilterKind::MinFilter,
            Self::Max { .. } => FilterKind::MaxFilter,
            Self::Mode { .. } => FilterKind::ModeFilter,
        }
    }
}
