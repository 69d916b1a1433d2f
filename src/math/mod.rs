//! Mathematical utilities for the synthesis pipeline

/// Bounded uniform draws
pub mod probability;
