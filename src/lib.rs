//! Procedural decoy image synthesis
//!
//! Images are built from randomly sampled shapes, randomly parameterized
//! filters and stacked pixel noise. The output looks like content to a
//! scraper but carries no meaning, which dilutes any dataset built from it.

#![forbid(unsafe_code)]

/// Output formats and color palettes
pub mod canvas;
/// Filter catalog, kernels and deadline-bounded application
pub mod filters;
/// Input/output operations, configuration and error handling
pub mod io;
/// Random sampling utilities
pub mod math;
/// Pixel noise models applied after rendering
pub mod noise;
/// Shape catalog, attribute sampling and rendering
pub mod shapes;
/// Intensity profiles and the end-to-end pipeline
pub mod synthesis;

pub use io::error::{PoisonError, Result};
pub use synthesis::{ImageSynthesizer, Intensity, SynthesisRequest};
