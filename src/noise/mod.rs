//! Post-render pixel noise injection

/// Noise kinds, per-call parameters and noise application
pub mod models;

pub use models::{NoiseKind, NoiseParameters, apply_noise};
