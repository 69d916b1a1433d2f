//! Error types for the synthesis pipeline

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Main error type for all synthesis operations
#[derive(Debug)]
pub enum PoisonError {
    /// A request or configuration value is not recognized or out of range
    InvalidConfiguration {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Shape name outside the built-in catalog
    UnsupportedShape {
        /// The name that failed to parse
        name: String,
    },

    /// Filter name outside the built-in catalog
    UnsupportedFilter {
        /// The name that failed to parse
        name: String,
    },

    /// Noise model name outside the built-in catalog
    UnsupportedNoise {
        /// The name that failed to parse
        name: String,
    },

    /// A filter did not finish before its deadline and was abandoned
    RenderTimeout {
        /// Filter that was abandoned
        filter: &'static str,
        /// Deadline that was exceeded
        deadline: Duration,
    },

    /// A filter worker died before producing a result
    FilterFailed {
        /// Filter that failed
        filter: &'static str,
        /// Description of the failure
        reason: String,
    },

    /// Failed to read back a saved raster
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode a raster
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl PoisonError {
    /// Whether the pipeline may skip the failed step and keep going
    ///
    /// Only filter steps are best-effort; everything else aborts synthesis.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::RenderTimeout { .. } | Self::FilterFailed { .. })
    }
}

impl fmt::Display for PoisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid configuration '{parameter}' = '{value}': {reason}")
            }
            Self::UnsupportedShape { name } => write!(f, "Shape '{name}' is not supported"),
            Self::UnsupportedFilter { name } => write!(f, "Filter '{name}' is not supported"),
            Self::UnsupportedNoise { name } => write!(f, "Noise type '{name}' is not supported"),
            Self::RenderTimeout { filter, deadline } => {
                write!(
                    f,
                    "Filter '{filter}' exceeded its {} ms deadline",
                    deadline.as_millis()
                )
            }
            Self::FilterFailed { filter, reason } => {
                write!(f, "Filter '{filter}' failed: {reason}")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for PoisonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, PoisonError>;

impl From<image::ImageError> for PoisonError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageExport {
            path: PathBuf::from("<memory>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for PoisonError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid configuration error
pub fn invalid_configuration(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> PoisonError {
    PoisonError::InvalidConfiguration {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to the path it concerns
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> PoisonError {
    PoisonError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
