//! Bounded uniform draws shared by the attribute, filter and noise samplers

use rand::Rng;
use rand::distr::uniform::SampleUniform;

/// Uniform draw from the closed range `[low, high]`
///
/// Collapses to `low` when the range is empty so callers can pass bounds
/// derived from tiny canvases without guarding every call.
pub fn uniform_inclusive<T, R>(rng: &mut R, low: T, high: T) -> T
where
    T: SampleUniform + PartialOrd + Copy,
    R: Rng + ?Sized,
{
    if high <= low {
        return low;
    }
    rng.random_range(low..=high)
}

/// Uniform draw from the half-open range `[low, high)`
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high <= low {
        return low;
    }
    rng.random_range(low..high)
}
