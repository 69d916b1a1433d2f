//! File, terminal and configuration plumbing around the synthesis pipeline

/// Argument parsing and batch execution
pub mod cli;
/// Constants and per-intensity defaults
pub mod configuration;
/// Error type shared by every module
pub mod error;
/// Saving and loading rasters
pub mod image;
/// Text tags inside encoded images
pub mod metadata;
/// Output directories and file names
pub mod paths;
/// Batch progress bar
pub mod progress;
