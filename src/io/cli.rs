//! Command-line interface for batch decoy image synthesis

use crate::canvas::palette::parse_color;
use crate::canvas::{ImageExtension, Palette, PixelMode};
use crate::filters::FilterKind;
use crate::io::configuration::{
    DEFAULT_HEIGHT, DEFAULT_NAME_LENGTH, DEFAULT_WIDTH, FilterLimits,
};
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use crate::shapes::ShapeKind;
use crate::synthesis::{ImageSynthesizer, Intensity, SynthesisRequest};
use clap::Parser;
use image::Rgb;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "poisonpix")]
#[command(
    author,
    version,
    about = "Generate procedural decoy images for scraper poisoning"
)]
/// Command-line arguments for the synthesis tool
pub struct Cli {
    /// Intensity tier: light, medium or heavy
    #[arg(short, long, default_value = "light")]
    pub mode: Intensity,

    /// Number of images to generate
    #[arg(short = 'n', long, default_value_t = 1)]
    pub count: usize,

    /// Canvas width in pixels
    #[arg(short = 'w', long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Base output directory (images land in <OUTPUT>/Images/<mode>/<w>_<h>)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output format: jpg or png
    #[arg(short, long, default_value = "jpg")]
    pub extension: ImageExtension,

    /// Saved pixel mode: RGB, RGBA or L
    #[arg(short, long, default_value = "RGB")]
    pub pixel_mode: PixelMode,

    /// Palette preset name or comma-separated colors (#rrggbb or CSS names)
    #[arg(long)]
    pub palette: Option<Palette>,

    /// Fixed background color
    #[arg(long, value_parser = parse_color)]
    pub background: Option<Rgb<u8>>,

    /// Restrict to these shape kinds
    #[arg(long, value_delimiter = ',')]
    pub shapes: Option<Vec<ShapeKind>>,

    /// Restrict to these filter kinds
    #[arg(long, value_delimiter = ',', conflicts_with = "no_filters")]
    pub filters: Option<Vec<FilterKind>>,

    /// Skip the filter stage entirely
    #[arg(long)]
    pub no_filters: bool,

    /// Random seed for reproducible batches
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Per-filter deadline in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub deadline_ms: u64,

    /// Length of the random file name
    #[arg(long, default_value_t = DEFAULT_NAME_LENGTH)]
    pub name_length: usize,

    /// Largest unsharp-mask percentage (defaults to the mode's limit)
    #[arg(long, help_heading = "Filter limits")]
    pub max_percent: Option<u32>,

    /// Largest unsharp-mask threshold
    #[arg(long, help_heading = "Filter limits")]
    pub max_threshold: Option<u32>,

    /// Largest kernel coefficient and coefficient count, as COEFF,COUNT
    #[arg(
        long,
        value_name = "COEFF,COUNT",
        value_parser = parse_kernel_limit,
        help_heading = "Filter limits"
    )]
    pub max_kernel: Option<(f32, usize)>,

    /// Largest kernel divisor
    #[arg(long, value_parser = parse_bound, help_heading = "Filter limits")]
    pub max_scale: Option<f32>,

    /// Largest kernel offset
    #[arg(long, value_parser = parse_bound, help_heading = "Filter limits")]
    pub max_offset: Option<f32>,

    /// Only log warnings and errors, hide the progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every pipeline step
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Most detailed log level to emit
    pub const fn log_level(&self) -> Level {
        if self.quiet {
            Level::WARN
        } else if self.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }

    /// Filter limits with any command-line overrides applied
    ///
    /// Returns `None` when no limit flag was given, leaving the tier
    /// defaults to the request.
    pub fn filter_limits(&self) -> Option<FilterLimits> {
        let overridden = self.max_percent.is_some()
            || self.max_threshold.is_some()
            || self.max_kernel.is_some()
            || self.max_scale.is_some()
            || self.max_offset.is_some();
        if !overridden {
            return None;
        }

        let defaults = FilterLimits::for_intensity(self.mode);
        Some(FilterLimits {
            max_percent: self.max_percent.unwrap_or(defaults.max_percent),
            max_threshold: self.max_threshold.unwrap_or(defaults.max_threshold),
            max_kernel: self.max_kernel.unwrap_or(defaults.max_kernel),
            max_scale: self.max_scale.unwrap_or(defaults.max_scale),
            max_offset: self.max_offset.unwrap_or(defaults.max_offset),
        })
    }

    /// Build the synthesis request these arguments describe
    ///
    /// # Errors
    ///
    /// Returns an invalid configuration error if the combination cannot
    /// produce a file, such as RGBA output as JPEG
    pub fn to_request(&self) -> Result<SynthesisRequest> {
        let mut request = SynthesisRequest::new(self.mode)
            .with_size(self.width, self.height)
            .with_pixel_mode(self.pixel_mode)
            .with_extension(self.extension)
            .with_name_length(self.name_length)
            .with_filter_deadline(Duration::from_millis(self.deadline_ms));

        if let Some(palette) = &self.palette {
            request = request.with_palette(palette.clone());
        }
        if let Some(background) = self.background {
            request = request.with_background(background);
        }
        if let Some(output) = &self.output {
            request = request.with_output_dir(output);
        }
        if let Some(shapes) = &self.shapes {
            request = request.with_shapes(shapes.clone());
        }
        if let Some(limits) = self.filter_limits() {
            request = request.with_filter_limits(limits);
        }
        if self.no_filters {
            request = request.with_filters(Vec::new());
        } else if let Some(filters) = &self.filters {
            request = request.with_filters(filters.clone());
        }

        request.validate()?;
        Ok(request)
    }
}

/// Parse a finite, non-negative float limit
///
/// # Errors
///
/// Returns a message when the text is not a number, or is negative or not
/// finite
pub fn parse_bound(text: &str) -> std::result::Result<f32, String> {
    let value: f32 = text
        .trim()
        .parse()
        .map_err(|e| format!("bad limit '{text}': {e}"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("limit must be a non-negative number, got {value}"));
    }
    Ok(value)
}

/// Parse a `COEFF,COUNT` kernel limit
///
/// # Errors
///
/// Returns a message when either half is missing or malformed
pub fn parse_kernel_limit(text: &str) -> std::result::Result<(f32, usize), String> {
    let (coefficient, count) = text
        .split_once(',')
        .ok_or_else(|| format!("expected COEFF,COUNT, got '{text}'"))?;
    let count: usize = count
        .trim()
        .parse()
        .map_err(|e| format!("bad kernel count '{count}': {e}"))?;
    Ok((parse_bound(coefficient)?, count))
}

/// Runs a batch of syntheses with progress tracking
pub struct BatchRunner {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl BatchRunner {
    /// Create a new batch runner with the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Generate every requested image
    ///
    /// # Errors
    ///
    /// Returns the first synthesis error; images written before it stay
    /// on disk
    pub fn process(&mut self) -> Result<Vec<PathBuf>> {
        let request = self.cli.to_request()?;

        match self.cli.seed {
            Some(seed) => {
                let mut synthesizer = ImageSynthesizer::with_rng(StdRng::seed_from_u64(seed));
                self.run_batch(&request, &mut synthesizer)
            }
            None => self.run_batch(&request, &mut ImageSynthesizer::new()),
        }
    }

    fn run_batch<R: Rng>(
        &mut self,
        request: &SynthesisRequest,
        synthesizer: &mut ImageSynthesizer<R>,
    ) -> Result<Vec<PathBuf>> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(self.cli.count, request.intensity);
        }

        let mut written = Vec::with_capacity(self.cli.count);
        for _ in 0..self.cli.count {
            let path = synthesizer.synthesize(request)?;
            tracing::info!(path = %path.display(), mode = %request.intensity, "generated image");

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_image(&path);
            }
            written.push(path);
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.finish();
        }

        Ok(written)
    }
}
