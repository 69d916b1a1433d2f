//! Statistical pixel-noise models over unit-range rasters
//!
//! Rasters are `(height, width, channels)` arrays with samples in `[0, 1]`.
//! Parameters are drawn once per synthesis call and passed explicitly to
//! every noise pass of that call, so stacked passes share their statistics.

use crate::io::error::{PoisonError, Result};
use crate::math::probability::uniform;
use crate::synthesis::profile::Intensity;
use ndarray::{Array2, Array3};
use rand::Rng;
use rand_distr::{Distribution, Normal, Poisson};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// Mean and variances are sampled on the 8-bit scale
const EIGHT_BIT: f64 = 255.0;

/// Pixel-level noise models
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NoiseKind {
    /// Additive gaussian noise
    Gaussian,
    /// Additive zero-mean gaussian noise with per-pixel variance
    LocalVariance,
    /// Poisson shot noise
    Poisson,
    /// Random samples set to white
    Salt,
    /// Random samples set to black
    Pepper,
    /// Random samples set to white or black
    SaltAndPepper,
    /// Multiplicative gaussian noise
    Speckle,
}

impl NoiseKind {
    /// The full built-in catalog
    pub const ALL: [Self; 7] = [
        Self::Gaussian,
        Self::LocalVariance,
        Self::Poisson,
        Self::Salt,
        Self::Pepper,
        Self::SaltAndPepper,
        Self::Speckle,
    ];

    /// Catalog name
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::LocalVariance => "localvar",
            Self::Poisson => "poisson",
            Self::Salt => "salt",
            Self::Pepper => "pepper",
            Self::SaltAndPepper => "salt_pepper",
            Self::Speckle => "speckle",
        }
    }
}

impl FromStr for NoiseKind {
    type Err = PoisonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            // Older configurations carry the misspelling
            "gaussian" | "guassian" => Ok(Self::Gaussian),
            "localvar" | "local_var" | "local_variance" => Ok(Self::LocalVariance),
            "poisson" => Ok(Self::Poisson),
            "salt" => Ok(Self::Salt),
            "pepper" => Ok(Self::Pepper),
            "salt_pepper" | "s&p" | "salt_and_pepper" => Ok(Self::SaltAndPepper),
            "speckle" => Ok(Self::Speckle),
            _ => Err(PoisonError::UnsupportedNoise {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Statistics shared by every noise pass of one synthesis call
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseParameters {
    /// Gaussian and speckle mean, 8-bit scale
    pub mean: f64,
    /// Gaussian and speckle variance, 8-bit scale
    pub variance: f64,
    /// Per-pixel variance map `(height, width)`, 8-bit scale
    pub local_variances: Array2<f64>,
    /// Fraction of samples replaced by salt or pepper
    pub amount: f64,
    /// Share of replaced samples that become salt
    pub salt_vs_pepper: f64,
}

impl NoiseParameters {
    /// Draw the parameters for an intensity tier and raster size
    pub fn sample<R: Rng + ?Sized>(
        intensity: Intensity,
        height: usize,
        width: usize,
        rng: &mut R,
    ) -> Self {
        let (mean, variance, local, amount, salt_vs_pepper) = match intensity {
            Intensity::Light => (
                uniform(rng, 75.0, 150.0),
                uniform(rng, 0.001, 10.0),
                (0.01, 0.1),
                uniform(rng, 0.01, 0.1),
                0.5,
            ),
            Intensity::Medium => (
                uniform(rng, 10.0, 100.0),
                uniform(rng, 10.0, 100.0),
                (10.0, 100.0),
                uniform(rng, 0.1, 0.5),
                uniform(rng, 0.25, 0.75),
            ),
            Intensity::Heavy => (
                uniform(rng, 0.0, 256.0),
                uniform(rng, 0.0, 256.0),
                (100.0, 1000.0),
                uniform(rng, 0.5, 1.0),
                uniform(rng, 0.01, 0.99),
            ),
        };

        let local_variances =
            Array2::from_shape_fn((height, width), |_| uniform(rng, local.0, local.1));

        Self {
            mean,
            variance,
            local_variances,
            amount,
            salt_vs_pepper,
        }
    }
}

/// Apply one noise model and clip the result back to `[0, 1]`
pub fn apply_noise<R: Rng + ?Sized>(
    image: &Array3<f64>,
    kind: NoiseKind,
    params: &NoiseParameters,
    rng: &mut R,
) -> Array3<f64> {
    let mean = params.mean / EIGHT_BIT;
    let std_dev = params.variance.max(0.0).sqrt() / EIGHT_BIT;
    let mut output = image.clone();

    match kind {
        NoiseKind::Gaussian => {
            if let Ok(gaussian) = Normal::new(mean, std_dev) {
                output.mapv_inplace(|v| v + gaussian.sample(rng));
            }
        }
        NoiseKind::Speckle => {
            if let Ok(gaussian) = Normal::new(mean, std_dev) {
                output.mapv_inplace(|v| v.mul_add(gaussian.sample(rng), v));
            }
        }
        NoiseKind::LocalVariance => {
            for ((y, x, _), value) in output.indexed_iter_mut() {
                let variance = params
                    .local_variances
                    .get([y, x])
                    .copied()
                    .unwrap_or(0.0)
                    .max(0.0);
                if let Ok(gaussian) = Normal::new(0.0, variance.sqrt() / EIGHT_BIT) {
                    *value += gaussian.sample(rng);
                }
            }
        }
        NoiseKind::Poisson => {
            let levels = poisson_levels(image);
            output.mapv_inplace(|v| shot_count(v.max(0.0) * levels, rng) / levels);
        }
        NoiseKind::Salt => {
            output.mapv_inplace(|v| if rng.random::<f64>() < params.amount { 1.0 } else { v });
        }
        NoiseKind::Pepper => {
            output.mapv_inplace(|v| if rng.random::<f64>() < params.amount { 0.0 } else { v });
        }
        NoiseKind::SaltAndPepper => {
            output.mapv_inplace(|v| {
                if rng.random::<f64>() < params.amount {
                    if rng.random::<f64>() < params.salt_vs_pepper { 1.0 } else { 0.0 }
                } else {
                    v
                }
            });
        }
    }

    output.mapv_inplace(|v| v.clamp(0.0, 1.0));
    output
}

// Black samples have a zero rate, which Poisson::new rejects
fn shot_count<R: Rng + ?Sized>(lambda: f64, rng: &mut R) -> f64 {
    Poisson::new(lambda).map_or(0.0, |poisson| poisson.sample(rng))
}

/// Poisson scaling: the next power of two above the distinct-value count
pub fn poisson_levels(image: &Array3<f64>) -> f64 {
    let distinct: HashSet<u8> = image.iter().map(|&v| unit_to_u8(v)).collect();
    let count = distinct.len().max(1) as f64;
    2.0_f64.powf(count.log2().ceil())
}

fn unit_to_u8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * EIGHT_BIT).round() as u8
}

/// Raster of 8-bit samples scaled into `[0, 1]`
pub fn from_u8_raster(raster: &Array3<u8>) -> Array3<f64> {
    raster.mapv(|v| f64::from(v) / EIGHT_BIT)
}

/// Renormalize a unit-range raster to 8-bit samples
pub fn to_u8_raster(raster: &Array3<f64>) -> Array3<u8> {
    raster.mapv(unit_to_u8)
}
