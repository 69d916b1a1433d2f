//! Shape catalog, attribute sampling and rendering
//!
//! This module contains:
//! - The twelve-kind shape catalog and per-instance attribute generation
//! - Palette-driven dispatch from a shape instance to anti-aliased `vello_cpu` draw calls

/// Shape kinds and randomized attribute sets
pub mod attributes;
/// Draw dispatch for one shape instance
pub mod renderer;

pub use attributes::{ShapeKind, ShapeSpec};
pub use renderer::{ShapePainter, render_shape};
