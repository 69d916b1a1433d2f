//! Intensity profiles and the synthesis pipeline that consumes them

/// Request, synthesizer and step interleaving
pub mod orchestrator;
/// Intensity tiers and resolved generation budgets
pub mod profile;

pub use orchestrator::{ImageSynthesizer, SynthesisRequest};
pub use profile::{GenerationProfile, Intensity};
