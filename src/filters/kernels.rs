//! Filter implementations over RGB rasters
//!
//! Gaussian blur, unsharp masking and the 3x3 built-in kernels run through
//! `image::imageops`; those passes check the [`CancelToken`] before and
//! after the call. The hand-written passes poll it once per row. Either way
//! `None` comes back as soon as the caller has given up. Samples outside the
//! image repeat the nearest edge pixel.

use crate::filters::deadline::CancelToken;
use image::{Rgb, RgbImage, imageops};

/// Fixed 3x3 or 5x5 convolution kernel
///
/// For 3x3 kernels `scale` must equal the weight sum, or 1 when the sum is
/// zero, and a non-zero `offset` needs a zero sum.
#[derive(Clone, Copy, Debug)]
pub struct FixedKernel {
    /// Kernel side
    pub side: usize,
    /// Row-major weights
    pub weights: &'static [f32],
    /// Divisor applied to the weighted sum
    pub scale: f32,
    /// Offset added after division
    pub offset: f32,
}

/// Ring blur
pub const BLUR: FixedKernel = FixedKernel {
    side: 5,
    weights: &[
        1.0, 1.0, 1.0, 1.0, 1.0, //
        1.0, 0.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 0.0, 1.0, //
        1.0, 0.0, 0.0, 0.0, 1.0, //
        1.0, 1.0, 1.0, 1.0, 1.0,
    ],
    scale: 16.0,
    offset: 0.0,
};

/// Contour extraction on a white background
pub const CONTOUR: FixedKernel = FixedKernel {
    side: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 255.0,
};

/// Detail enhancement
pub const DETAIL: FixedKernel = FixedKernel {
    side: 3,
    weights: &[0.0, -1.0, 0.0, -1.0, 10.0, -1.0, 0.0, -1.0, 0.0],
    scale: 6.0,
    offset: 0.0,
};

/// Mild edge enhancement
pub const EDGE_ENHANCE: FixedKernel = FixedKernel {
    side: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 10.0, -1.0, -1.0, -1.0, -1.0],
    scale: 2.0,
    offset: 0.0,
};

/// Strong edge enhancement
pub const EDGE_ENHANCE_MORE: FixedKernel = FixedKernel {
    side: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 9.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 0.0,
};

/// Emboss relief around mid gray
pub const EMBOSS: FixedKernel = FixedKernel {
    side: 3,
    weights: &[-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0],
    scale: 1.0,
    offset: 128.0,
};

/// Edge detection
pub const FIND_EDGES: FixedKernel = FixedKernel {
    side: 3,
    weights: &[-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0],
    scale: 1.0,
    offset: 0.0,
};

/// Sharpening
pub const SHARPEN: FixedKernel = FixedKernel {
    side: 3,
    weights: &[-2.0, -2.0, -2.0, -2.0, 32.0, -2.0, -2.0, -2.0, -2.0],
    scale: 16.0,
    offset: 0.0,
};

/// 3x3 smoothing
pub const SMOOTH: FixedKernel = FixedKernel {
    side: 3,
    weights: &[1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0],
    scale: 13.0,
    offset: 0.0,
};

/// 5x5 smoothing
pub const SMOOTH_MORE: FixedKernel = FixedKernel {
    side: 5,
    weights: &[
        1.0, 1.0, 1.0, 1.0, 1.0, //
        1.0, 5.0, 5.0, 5.0, 1.0, //
        1.0, 5.0, 44.0, 5.0, 1.0, //
        1.0, 5.0, 5.0, 5.0, 1.0, //
        1.0, 1.0, 1.0, 1.0, 1.0,
    ],
    scale: 100.0,
    offset: 0.0,
};

fn clamp_coordinate(value: i64, extent: u32) -> u32 {
    value.clamp(0, i64::from(extent.max(1)) - 1) as u32
}

// Edge-replicating read
fn sample(image: &RgbImage, x: i64, y: i64) -> Rgb<u8> {
    let cx = clamp_coordinate(x, image.width());
    let cy = clamp_coordinate(y, image.height());
    image.get_pixel_checked(cx, cy).copied().unwrap_or(Rgb([0, 0, 0]))
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Convolve with a square kernel
///
/// A zero `scale` falls back to the kernel sum, or 1 when that is zero too.
pub fn convolve(
    image: &RgbImage,
    side: usize,
    weights: &[f32],
    scale: f32,
    offset: f32,
    cancel: &CancelToken,
) -> Option<RgbImage> {
    let divisor = if scale == 0.0 {
        let sum: f32 = weights.iter().sum();
        if sum == 0.0 { 1.0 } else { sum }
    } else {
        scale
    };
    let half = (side / 2) as i64;
    let mut output = RgbImage::new(image.width(), image.height());

    for y in 0..image.height() {
        if cancel.is_cancelled() {
            return None;
        }
        for x in 0..image.width() {
            let mut acc = [0.0_f32; 3];
            for (index, weight) in weights.iter().enumerate().take(side * side) {
                let kx = (index % side) as i64 - half;
                let ky = (index / side) as i64 - half;
                let Rgb(pixel) = sample(image, i64::from(x) + kx, i64::from(y) + ky);
                for (sum, channel) in acc.iter_mut().zip(pixel) {
                    *sum = weight.mul_add(f32::from(channel), *sum);
                }
            }
            let pixel = Rgb(acc.map(|sum| to_channel(sum / divisor + offset)));
            output.put_pixel(x, y, pixel);
        }
    }

    Some(output)
}

/// Convolve with one of the built-in kernels
pub fn convolve_fixed(
    image: &RgbImage,
    kernel: &FixedKernel,
    cancel: &CancelToken,
) -> Option<RgbImage> {
    match <&[f32; 9]>::try_from(kernel.weights) {
        Ok(weights) if kernel.side == 3 => filter_small(image, weights, kernel.offset, cancel),
        _ => convolve(
            image,
            kernel.side,
            kernel.weights,
            kernel.scale,
            kernel.offset,
            cancel,
        ),
    }
}

fn filter_small(
    image: &RgbImage,
    weights: &[f32; 9],
    offset: f32,
    cancel: &CancelToken,
) -> Option<RgbImage> {
    if cancel.is_cancelled() {
        return None;
    }

    let mut output = imageops::filter3x3(image, weights);
    if offset != 0.0 {
        // Zero-sum response split into its rising and falling halves
        let falling = imageops::filter3x3(image, &weights.map(|w| -w));
        for (pixel, down) in output.pixels_mut().zip(falling.pixels()) {
            for (channel, d) in pixel.0.iter_mut().zip(down.0) {
                *channel = to_channel(offset + f32::from(*channel) - f32::from(d));
            }
        }
    }
    keep_border(image, &mut output);

    (!cancel.is_cancelled()).then_some(output)
}

// Edge rows and columns pass through 3x3 filters unchanged
fn keep_border(source: &RgbImage, output: &mut RgbImage) {
    let (width, height) = source.dimensions();
    for (x, y, pixel) in output.enumerate_pixels_mut() {
        let inside = x > 0 && y > 0 && x + 1 < width && y + 1 < height;
        if inside {
            continue;
        }
        if let Some(original) = source.get_pixel_checked(x, y) {
            *pixel = *original;
        }
    }
}

#[derive(Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

// Sliding-window mean along one axis; O(1) per pixel regardless of radius
fn box_pass(image: &RgbImage, radius: usize, axis: Axis, cancel: &CancelToken) -> Option<RgbImage> {
    let (width, height) = image.dimensions();
    let (lines, length) = match axis {
        Axis::Horizontal => (height, width),
        Axis::Vertical => (width, height),
    };
    let at = |line: u32, position: i64| match axis {
        Axis::Horizontal => sample(image, position, i64::from(line)),
        Axis::Vertical => sample(image, i64::from(line), position),
    };
    let r = radius as i64;
    let window = (2 * radius + 1) as f32;
    let mut output = RgbImage::new(width, height);

    for line in 0..lines {
        if cancel.is_cancelled() {
            return None;
        }
        let mut sums = [0.0_f32; 3];
        for position in -r..=r {
            let Rgb(pixel) = at(line, position);
            for (sum, channel) in sums.iter_mut().zip(pixel) {
                *sum += f32::from(channel);
            }
        }
        for position in 0..length {
            let pixel = Rgb(sums.map(|sum| to_channel(sum / window)));
            match axis {
                Axis::Horizontal => output.put_pixel(position, line, pixel),
                Axis::Vertical => output.put_pixel(line, position, pixel),
            }
            let Rgb(leaving) = at(line, i64::from(position) - r);
            let Rgb(entering) = at(line, i64::from(position) + r + 1);
            for ((sum, out), inn) in sums.iter_mut().zip(leaving).zip(entering) {
                *sum += f32::from(inn) - f32::from(out);
            }
        }
    }

    Some(output)
}

/// Box blur with a square window of half-width `radius`
pub fn box_blur(image: &RgbImage, radius: f32, cancel: &CancelToken) -> Option<RgbImage> {
    let r = radius.max(0.0).round() as usize;
    if r == 0 {
        return Some(image.clone());
    }
    let horizontal = box_pass(image, r, Axis::Horizontal, cancel)?;
    box_pass(&horizontal, r, Axis::Vertical, cancel)
}

/// Gaussian blur of standard deviation `sigma`
pub fn gaussian_blur(image: &RgbImage, sigma: f32, cancel: &CancelToken) -> Option<RgbImage> {
    if cancel.is_cancelled() {
        return None;
    }
    if sigma <= 0.0 {
        return Some(image.clone());
    }

    let longest = image.width().max(image.height()) as f32;
    let blurred = imageops::fast_blur(image, sigma.min(longest));
    (!cancel.is_cancelled()).then_some(blurred)
}

/// Sharpen by adding back `percent` of the difference to a blurred copy
///
/// Channels whose difference is below `threshold` are left untouched.
pub fn unsharp_mask(
    image: &RgbImage,
    radius: f32,
    percent: u32,
    threshold: u32,
    cancel: &CancelToken,
) -> Option<RgbImage> {
    if cancel.is_cancelled() {
        return None;
    }
    if radius <= 0.0 {
        return Some(image.clone());
    }

    // imageops compares with `>`, the mask keeps differences equal to the threshold
    let strict = i32::try_from(threshold).unwrap_or(i32::MAX).saturating_sub(1);
    let sharpened = imageops::unsharpen(image, radius, strict);
    let amount = percent as f32 / 100.0;
    let mut output = image.clone();
    for (pixel, sharp) in output.pixels_mut().zip(sharpened.pixels()) {
        for (channel, s) in pixel.0.iter_mut().zip(sharp.0) {
            let difference = f32::from(s) - f32::from(*channel);
            *channel = to_channel(difference.mul_add(amount, f32::from(*channel)));
        }
    }

    (!cancel.is_cancelled()).then_some(output)
}

/// Which value a rank-order filter keeps from its window
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankSelector {
    /// Zero-based position in the sorted window
    Rank(usize),
    /// Most frequent value, when it occurs more than twice
    Mode,
}

// Per-channel 256-bin histograms of the current window
struct WindowHistogram {
    bins: [[u32; 256]; 3],
}

impl WindowHistogram {
    const fn new() -> Self {
        Self {
            bins: [[0; 256]; 3],
        }
    }

    fn adjust(&mut self, pixel: Rgb<u8>, add: bool) {
        for (bins, value) in self.bins.iter_mut().zip(pixel.0) {
            if let Some(count) = bins.get_mut(usize::from(value)) {
                if add {
                    *count += 1;
                } else {
                    *count = count.saturating_sub(1);
                }
            }
        }
    }

    fn select(&self, selector: RankSelector, original: Rgb<u8>) -> Rgb<u8> {
        let mut result = original;
        for ((bins, out), fallback) in self.bins.iter().zip(result.0.iter_mut()).zip(original.0) {
            *out = match selector {
                RankSelector::Rank(rank) => nth_value(bins, rank),
                RankSelector::Mode => mode_value(bins).unwrap_or(fallback),
            };
        }
        result
    }
}

fn nth_value(bins: &[u32; 256], rank: usize) -> u8 {
    let mut seen = 0_usize;
    for (value, &count) in bins.iter().enumerate() {
        seen += count as usize;
        if seen > rank {
            return value as u8;
        }
    }
    u8::MAX
}

fn mode_value(bins: &[u32; 256]) -> Option<u8> {
    let (value, count) = bins
        .iter()
        .enumerate()
        .max_by_key(|&(value, &count)| (count, std::cmp::Reverse(value)))?;
    (*count > 2).then_some(value as u8)
}

/// Rank-order filter over a square window of odd side `size`
///
/// Uses a sliding histogram so each step costs O(size) rather than
/// O(size²). The window always holds `size * size` samples thanks to edge
/// replication, so ranks mean the same thing everywhere.
pub fn rank_filter(
    image: &RgbImage,
    size: u32,
    selector: RankSelector,
    cancel: &CancelToken,
) -> Option<RgbImage> {
    let half = i64::from(size / 2);
    let (width, height) = image.dimensions();
    let mut output = RgbImage::new(width, height);

    for y in 0..height {
        if cancel.is_cancelled() {
            return None;
        }
        let yi = i64::from(y);
        let mut histogram = WindowHistogram::new();
        for dy in -half..=half {
            for dx in -half..=half {
                histogram.adjust(sample(image, dx, yi + dy), true);
            }
        }

        for x in 0..width {
            let xi = i64::from(x);
            let original = sample(image, xi, yi);
            output.put_pixel(x, y, histogram.select(selector, original));

            for dy in -half..=half {
                histogram.adjust(sample(image, xi - half, yi + dy), false);
                histogram.adjust(sample(image, xi + half + 1, yi + dy), true);
            }
        }
    }

    Some(output)
}

/// Median of each window
pub fn median_filter(image: &RgbImage, size: u32, cancel: &CancelToken) -> Option<RgbImage> {
    let area = (size as usize) * (size as usize);
    rank_filter(image, size, RankSelector::Rank(area / 2), cancel)
}
