//! Canvas-level value types: output formats and color palettes

/// Pixel modes and file extensions of the saved raster
pub mod format;
/// Color palettes and color parsing
pub mod palette;

pub use format::{ImageExtension, PixelMode};
pub use palette::Palette;
