//! Filter catalog and bounded-time filter application
//!
//! This module contains:
//! - The nineteen-kind filter catalog and randomized argument bundles
//! - Convolution, blur and rank-order implementations
//! - Worker-thread execution with a per-invocation deadline

/// Applying a filter instance to a canvas
pub mod applicator;
/// Filter kinds, argument sampling and typed specs
pub mod catalog;
/// Detached worker execution with cooperative cancellation
pub mod deadline;
/// Filter algorithms
pub mod kernels;

pub use applicator::{apply_filter, run_filter};
pub use catalog::{FilterArgs, FilterKind, FilterSpec};
