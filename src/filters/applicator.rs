//! Applies one filter instance to the canvas under a wall-clock deadline

use crate::filters::catalog::{FilterKind, FilterSpec};
use crate::filters::deadline::{CancelToken, run_with_deadline};
use crate::filters::kernels::{
    BLUR, CONTOUR, DETAIL, EDGE_ENHANCE, EDGE_ENHANCE_MORE, EMBOSS, FIND_EDGES, FixedKernel,
    RankSelector, SHARPEN, SMOOTH, SMOOTH_MORE, box_blur, convolve, convolve_fixed,
    gaussian_blur, median_filter, rank_filter, unsharp_mask,
};
use crate::io::error::Result;
use image::RgbImage;
use std::time::Duration;

fn fixed_kernel(kind: FilterKind) -> Option<&'static FixedKernel> {
    match kind {
        FilterKind::Blur => Some(&BLUR),
        FilterKind::Contour => Some(&CONTOUR),
        FilterKind::Detail => Some(&DETAIL),
        FilterKind::EdgeEnhance => Some(&EDGE_ENHANCE),
        FilterKind::EdgeEnhanceMore => Some(&EDGE_ENHANCE_MORE),
        FilterKind::Emboss => Some(&EMBOSS),
        FilterKind::FindEdges => Some(&FIND_EDGES),
        FilterKind::Sharpen => Some(&SHARPEN),
        FilterKind::Smooth => Some(&SMOOTH),
        FilterKind::SmoothMore => Some(&SMOOTH_MORE),
        _ => None,
    }
}

/// Run a filter to completion on the current thread
///
/// Returns `None` if `cancel` fired before the filter finished.
pub fn run_filter(image: &RgbImage, spec: &FilterSpec, cancel: &CancelToken) -> Option<RgbImage> {
    match spec {
        FilterSpec::Fixed(kind) => match fixed_kernel(*kind) {
            Some(kernel) => convolve_fixed(image, kernel, cancel),
            None => Some(image.clone()),
        },
        FilterSpec::BoxBlur { radius } => box_blur(image, *radius, cancel),
        FilterSpec::GaussianBlur { radius } => gaussian_blur(image, *radius, cancel),
        FilterSpec::UnsharpMask {
            radius,
            percent,
            threshold,
        } => unsharp_mask(image, *radius, *percent, *threshold, cancel),
        FilterSpec::Kernel {
            side,
            weights,
            scale,
            offset,
        } => convolve(image, *side, weights, *scale, *offset, cancel),
        FilterSpec::Rank { size, rank } => {
            rank_filter(image, *size, RankSelector::Rank(*rank), cancel)
        }
        FilterSpec::Median { size } => median_filter(image, *size, cancel),
        FilterSpec::Min { size } => rank_filter(image, *size, RankSelector::Rank(0), cancel),
        FilterSpec::Max { size } => {
            let last = (*size as usize * *size as usize).saturating_sub(1);
            rank_filter(image, *size, RankSelector::Rank(last), cancel)
        }
        FilterSpec::Mode { size } => rank_filter(image, *size, RankSelector::Mode, cancel),
    }
}

/// Apply `spec` to the canvas, giving up after `deadline`
///
/// The worker filters a private copy; the canvas is only replaced once a
/// complete result arrives in time, so an abandoned worker never touches it.
///
/// # Errors
///
/// Returns a recoverable `RenderTimeout` or `FilterFailed` error when the
/// filter does not deliver in time; the canvas is unchanged in that case.
pub fn apply_filter(canvas: &mut RgbImage, spec: FilterSpec, deadline: Duration) -> Result<()> {
    let source = canvas.clone();
    let label = spec.kind().name();
    let filtered = run_with_deadline(label, deadline, move |cancel| {
        run_filter(&source, &spec, cancel)
    })?;
    *canvas = filtered;
    Ok(())
}
