//! End-to-end synthesis of one decoy image
//!
//! A call owns its canvas from creation to the final noise pass:
//! shapes and filters are interleaved on an in-memory RGB canvas, the result
//! is saved with its mode tag, then reloaded and re-saved once per noise
//! model of the tier.

use crate::canvas::{ImageExtension, Palette, PixelMode};
use crate::filters::{FilterArgs, FilterKind, FilterSpec, apply_filter};
use crate::io::configuration::{
    DEFAULT_FILTER_DEADLINE, DEFAULT_HEIGHT, DEFAULT_NAME_LENGTH, DEFAULT_WIDTH, DENSITY_MAX,
    DENSITY_MIN, FilterLimits, POINTS_MAX, POINTS_MIN,
};
use crate::io::error::{Result, invalid_configuration};
use crate::io::image::{load_raster, raster_to_image, save_raster};
use crate::io::metadata::mode_tag;
use crate::io::paths::{generate_unique_filename, image_directory};
use crate::math::probability::uniform_inclusive;
use crate::noise::models::{from_u8_raster, to_u8_raster};
use crate::noise::{NoiseParameters, apply_noise};
use crate::shapes::{ShapeKind, ShapePainter, ShapeSpec};
use crate::synthesis::profile::{GenerationProfile, Intensity};
use image::{Rgb, RgbImage};
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything one synthesis call needs to know
#[derive(Clone, Debug)]
pub struct SynthesisRequest {
    /// Tier driving counts, numeric ranges and noise breadth
    pub intensity: Intensity,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Pixel layout of the saved file
    pub pixel_mode: PixelMode,
    /// Colors for the background and every drawn element
    pub palette: Palette,
    /// Fixed background color; drawn from the palette when absent
    pub background: Option<Rgb<u8>>,
    /// Base output directory; the current directory when absent
    pub output_dir: Option<PathBuf>,
    /// Restrict shape sampling to these kinds
    pub shapes: Option<Vec<ShapeKind>>,
    /// Restrict filter sampling to these kinds
    pub filters: Option<Vec<FilterKind>>,
    /// Output file format
    pub extension: ImageExtension,
    /// Length of the random file stem
    pub name_length: usize,
    /// Override for the tier's filter argument caps
    pub filter_limits: Option<FilterLimits>,
    /// Wall-clock budget per filter invocation
    pub filter_deadline: Duration,
}

impl Default for SynthesisRequest {
    fn default() -> Self {
        Self::new(Intensity::default())
    }
}

impl SynthesisRequest {
    /// Request with default size, palette and format for a tier
    pub fn new(intensity: Intensity) -> Self {
        Self {
            intensity,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            pixel_mode: PixelMode::default(),
            palette: Palette::default(),
            background: None,
            output_dir: None,
            shapes: None,
            filters: None,
            extension: ImageExtension::default(),
            name_length: DEFAULT_NAME_LENGTH,
            filter_limits: None,
            filter_deadline: DEFAULT_FILTER_DEADLINE,
        }
    }

    /// Set the canvas size
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the saved pixel layout
    #[must_use]
    pub const fn with_pixel_mode(mut self, pixel_mode: PixelMode) -> Self {
        self.pixel_mode = pixel_mode;
        self
    }

    /// Set the drawing palette
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Fix the background color
    #[must_use]
    pub const fn with_background(mut self, background: Rgb<u8>) -> Self {
        self.background = Some(background);
        self
    }

    /// Write under `dir` instead of the current directory
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Restrict the shape catalog
    #[must_use]
    pub fn with_shapes(mut self, shapes: Vec<ShapeKind>) -> Self {
        self.shapes = Some(shapes);
        self
    }

    /// Restrict the shape catalog by name
    ///
    /// # Errors
    ///
    /// Returns an unsupported shape error for the first unknown name
    pub fn with_shape_names<S: AsRef<str>>(self, names: &[S]) -> Result<Self> {
        let shapes = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<ShapeKind>>>()?;
        Ok(self.with_shapes(shapes))
    }

    /// Restrict the filter catalog
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<FilterKind>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Restrict the filter catalog by name
    ///
    /// # Errors
    ///
    /// Returns an unsupported filter error for the first unknown name
    pub fn with_filter_names<S: AsRef<str>>(self, names: &[S]) -> Result<Self> {
        let filters = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<FilterKind>>>()?;
        Ok(self.with_filters(filters))
    }

    /// Set the output format
    #[must_use]
    pub const fn with_extension(mut self, extension: ImageExtension) -> Self {
        self.extension = extension;
        self
    }

    /// Set the random file stem length
    #[must_use]
    pub const fn with_name_length(mut self, name_length: usize) -> Self {
        self.name_length = name_length;
        self
    }

    /// Override the tier's filter argument caps
    #[must_use]
    pub const fn with_filter_limits(mut self, limits: FilterLimits) -> Self {
        self.filter_limits = Some(limits);
        self
    }

    /// Set the per-filter deadline
    #[must_use]
    pub const fn with_filter_deadline(mut self, deadline: Duration) -> Self {
        self.filter_deadline = deadline;
        self
    }

    /// Filter argument caps in effect for this request
    pub fn filter_limits(&self) -> FilterLimits {
        self.filter_limits
            .unwrap_or_else(|| FilterLimits::for_intensity(self.intensity))
    }

    /// Base directory the image tree is created under
    pub fn output_base(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    /// Reject requests that cannot produce a file
    ///
    /// # Errors
    ///
    /// Returns an invalid configuration error for an empty canvas, an empty
    /// file stem, or a pixel mode the extension cannot store
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid_configuration(
                "size",
                &format!("{}x{}", self.width, self.height),
                &"canvas dimensions must be positive",
            ));
        }

        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(invalid_configuration(
                "size",
                &format!("{}x{}", self.width, self.height),
                &format!("canvas sides are limited to {}", u16::MAX),
            ));
        }

        if self.name_length == 0 {
            return Err(invalid_configuration(
                "name_length",
                &self.name_length,
                &"file names need at least one character",
            ));
        }

        if !self.extension.supports(self.pixel_mode) {
            return Err(invalid_configuration(
                "pixel_mode",
                &self.pixel_mode,
                &format!("{} cannot store this mode", self.extension),
            ));
        }

        Ok(())
    }
}

/// Pair up two step lists position by position
///
/// The result is as long as the longer input; the shorter side is padded
/// with `None`.
pub fn interleave<A: Copy, B: Copy>(first: &[A], second: &[B]) -> Vec<(Option<A>, Option<B>)> {
    let steps = first.len().max(second.len());
    (0..steps)
        .map(|step| (first.get(step).copied(), second.get(step).copied()))
        .collect()
}

fn expand_instances<T: Copy>(kinds: &[T], instances: usize) -> Vec<T> {
    kinds
        .iter()
        .flat_map(|&kind| std::iter::repeat_n(kind, instances))
        .collect()
}

/// Produces decoy images from requests
///
/// The synthesizer owns its random source; use [`ImageSynthesizer::with_rng`]
/// with a seeded generator for repeatable output.
#[derive(Debug)]
pub struct ImageSynthesizer<R: Rng = ThreadRng> {
    rng: R,
}

impl Default for ImageSynthesizer<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSynthesizer<ThreadRng> {
    /// Synthesizer backed by the thread-local generator
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl<R: Rng> ImageSynthesizer<R> {
    /// Synthesizer backed by `rng`
    pub const fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Run the full pipeline and return the path of the written file
    ///
    /// # Errors
    ///
    /// Returns the first non-recoverable error: an invalid request, a
    /// directory or file that cannot be written, or a saved image that
    /// cannot be read back. Filter timeouts and failures only skip the
    /// affected step.
    #[tracing::instrument(
        skip(self, request),
        fields(intensity = %request.intensity, width = request.width, height = request.height)
    )]
    pub fn synthesize(&mut self, request: &SynthesisRequest) -> Result<PathBuf> {
        request.validate()?;
        let profile = GenerationProfile::resolve(request.intensity);
        let density = uniform_inclusive(&mut self.rng, DENSITY_MIN, DENSITY_MAX);

        let directory = image_directory(
            request.output_base(),
            request.intensity,
            request.width,
            request.height,
        )?;
        let path = generate_unique_filename(
            &directory,
            request.extension,
            request.name_length,
            &mut self.rng,
        )?;

        let canvas = self.paint(request, &profile, density)?;

        let tag = mode_tag(request.intensity);
        save_raster(
            &request.pixel_mode.convert(&canvas),
            &path,
            request.extension,
            &tag,
        )?;

        self.inject_noise(request, &profile, &path, &tag)?;
        Ok(path)
    }

    fn paint(
        &mut self,
        request: &SynthesisRequest,
        profile: &GenerationProfile,
        density: u32,
    ) -> Result<RgbImage> {
        let (width, height) = (request.width, request.height);
        let background = request
            .background
            .unwrap_or_else(|| request.palette.choose(&mut self.rng));
        let mut canvas = RgbImage::from_pixel(width, height, background);

        let shape_catalog = request.shapes.as_deref().unwrap_or(&ShapeKind::ALL);
        let filter_catalog = request.filters.as_deref().unwrap_or(&FilterKind::ALL);
        if !filter_catalog.is_empty()
            && profile
                .retain_allowed_filters(filter_catalog.to_vec())
                .is_empty()
        {
            tracing::warn!(
                intensity = %profile.intensity,
                "every requested filter is excluded at this intensity"
            );
        }

        let mut shapes = expand_instances(
            &profile.select_shapes(shape_catalog, &mut self.rng),
            profile.shape_instances,
        );
        let mut filters = expand_instances(
            &profile.select_filters(filter_catalog, &mut self.rng),
            profile.filter_instances,
        );
        shapes.shuffle(&mut self.rng);
        filters.shuffle(&mut self.rng);

        tracing::debug!(
            density,
            shapes = shapes.len(),
            filters = filters.len(),
            "painting canvas"
        );

        let limits = request.filter_limits();
        let mut painter = ShapePainter::new(width, height)?;
        for (shape, filter) in interleave(&shapes, &filters) {
            if let Some(kind) = shape {
                let points = uniform_inclusive(&mut self.rng, POINTS_MIN, POINTS_MAX);
                let spec = ShapeSpec::sample(kind, height, width, points, density, &mut self.rng);
                painter.draw(&spec, &request.palette, &mut self.rng);
            }

            if let Some(kind) = filter {
                // Filters see every shape drawn so far
                painter.composite(&mut canvas);
                let args = FilterArgs::sample(height, width, density, &limits, &mut self.rng);
                let spec = FilterSpec::from_args(kind, &args);
                if let Err(error) = apply_filter(&mut canvas, spec, request.filter_deadline) {
                    if !error.is_recoverable() {
                        return Err(error);
                    }
                    tracing::debug!(filter = kind.name(), %error, "skipped filter step");
                }
            }
        }
        painter.composite(&mut canvas);

        Ok(canvas)
    }

    fn inject_noise(
        &mut self,
        request: &SynthesisRequest,
        profile: &GenerationProfile,
        path: &Path,
        tag: &str,
    ) -> Result<()> {
        // Shared by every pass of this call
        let params = NoiseParameters::sample(
            profile.intensity,
            request.height as usize,
            request.width as usize,
            &mut self.rng,
        );

        for &kind in &profile.noise_types {
            let raster = load_raster(path, request.pixel_mode)?;
            let noisy = apply_noise(&from_u8_raster(&raster), kind, &params, &mut self.rng);
            let image = raster_to_image(&to_u8_raster(&noisy), request.pixel_mode)?;
            save_raster(&image, path, request.extension, tag)?;
            tracing::debug!(noise = kind.name(), "applied noise pass");
        }

        Ok(())
    }
}
