//! Intensity tiers and the generation budgets they resolve to

use crate::filters::FilterKind;
use crate::io::error::{PoisonError, Result, invalid_configuration};
use crate::noise::NoiseKind;
use crate::shapes::ShapeKind;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;
use std::str::FromStr;

/// Coarse knob controlling instance counts, numeric ranges and noise breadth
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Intensity {
    /// Few shapes, rank-order filters excluded, two noise passes
    #[default]
    Light,
    /// More shapes and filters, rank-order still excluded, three noise passes
    Medium,
    /// Rank-order filters allowed, four noise passes
    Heavy,
}

impl Intensity {
    /// Every tier, lightest first
    pub const ALL: [Self; 3] = [Self::Light, Self::Medium, Self::Heavy];

    /// Lowercase tier name, also used for the metadata tag and directories
    pub const fn name(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }
}

impl FromStr for Intensity {
    type Err = PoisonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "heavy" => Ok(Self::Heavy),
            _ => Err(invalid_configuration(
                "mode",
                &s,
                &"expected one of light, medium, heavy",
            )),
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved generation budget for one synthesis call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationProfile {
    /// Tier this profile was resolved from
    pub intensity: Intensity,
    /// Shape kinds drawn (with replacement) from the catalog
    pub shape_kind_samples: usize,
    /// Filter kinds drawn (with replacement) from the catalog
    pub filter_kind_samples: usize,
    /// Instances rendered per selected shape kind
    pub shape_instances: usize,
    /// Instances applied per selected filter kind
    pub filter_instances: usize,
    /// Filter kinds never applied at this tier
    pub excluded_filters: Vec<FilterKind>,
    /// Noise passes applied after the save, in order
    pub noise_types: Vec<NoiseKind>,
}

impl GenerationProfile {
    /// Budget for an intensity tier
    pub fn resolve(intensity: Intensity) -> Self {
        let light_noise = vec![NoiseKind::Gaussian, NoiseKind::SaltAndPepper];

        match intensity {
            Intensity::Light => Self {
                intensity,
                shape_kind_samples: 10,
                filter_kind_samples: 3,
                shape_instances: 100,
                filter_instances: 1,
                excluded_filters: FilterKind::RANK_ORDER.to_vec(),
                noise_types: light_noise,
            },
            Intensity::Medium => Self {
                intensity,
                shape_kind_samples: 50,
                filter_kind_samples: 10,
                shape_instances: 250,
                filter_instances: 5,
                excluded_filters: FilterKind::RANK_ORDER.to_vec(),
                noise_types: [light_noise, vec![NoiseKind::Poisson]].concat(),
            },
            Intensity::Heavy => Self {
                intensity,
                shape_kind_samples: 50,
                filter_kind_samples: 15,
                shape_instances: 250,
                filter_instances: 5,
                excluded_filters: Vec::new(),
                noise_types: [
                    light_noise,
                    vec![NoiseKind::Poisson, NoiseKind::Speckle],
                ]
                .concat(),
            },
        }
    }

    /// Budget for a tier given by name
    ///
    /// # Errors
    ///
    /// Returns an invalid configuration error for names other than
    /// light, medium and heavy
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse().map(Self::resolve)
    }

    /// Whether `kind` may be applied at this tier
    pub fn allows_filter(&self, kind: FilterKind) -> bool {
        !self.excluded_filters.contains(&kind)
    }

    /// Sample shape kinds from `catalog`, with replacement
    pub fn select_shapes<R: Rng + ?Sized>(
        &self,
        catalog: &[ShapeKind],
        rng: &mut R,
    ) -> Vec<ShapeKind> {
        sample_with_replacement(catalog, self.shape_kind_samples, rng)
    }

    /// Sample filter kinds from `catalog`, with replacement, then drop excluded kinds
    pub fn select_filters<R: Rng + ?Sized>(
        &self,
        catalog: &[FilterKind],
        rng: &mut R,
    ) -> Vec<FilterKind> {
        let sampled = sample_with_replacement(catalog, self.filter_kind_samples, rng);
        self.retain_allowed_filters(sampled)
    }

    /// Drop filter kinds excluded at this tier
    pub fn retain_allowed_filters(&self, filters: Vec<FilterKind>) -> Vec<FilterKind> {
        filters
            .into_iter()
            .filter(|kind| self.allows_filter(*kind))
            .collect()
    }
}

fn sample_with_replacement<T: Copy, R: Rng + ?Sized>(
    catalog: &[T],
    count: usize,
    rng: &mut R,
) -> Vec<T> {
    (0..count)
        .filter_map(|_| catalog.choose(rng).copied())
        .collect()
}
