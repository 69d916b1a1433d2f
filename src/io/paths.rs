//! Output directory resolution and unique file naming

use crate::canvas::ImageExtension;
use crate::io::configuration::{IMAGE_SUBFOLDER, UNIQUE_NAME_ATTEMPTS};
use crate::io::error::{PoisonError, Result, file_system};
use crate::synthesis::profile::Intensity;
use rand::Rng;
use rand::distr::{Alphanumeric, Distribution};
use std::path::{Path, PathBuf};

/// Resolve `base/subfolder`, creating every missing directory on the way
///
/// A `base` that already ends in `subfolder` is used as-is.
///
/// # Errors
///
/// Returns a file system error if `base` exists but is not a directory, or
/// if a directory cannot be created
pub fn resolve_output_directory(base: &Path, subfolder: &str) -> Result<PathBuf> {
    if base.exists() && !base.is_dir() {
        return Err(file_system(
            base,
            "resolve output directory",
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "path exists and is not a directory",
            ),
        ));
    }

    let directory = if base.file_name().is_some_and(|name| name == subfolder) {
        base.to_path_buf()
    } else {
        base.join(subfolder)
    };

    std::fs::create_dir_all(&directory)
        .map_err(|e| file_system(&directory, "create directory", e))?;

    Ok(directory)
}

/// Directory for one tier and canvas size: `base/Images/<tier>/<w>_<h>`
///
/// # Errors
///
/// Propagates errors from [`resolve_output_directory`]
pub fn image_directory(
    base: &Path,
    intensity: Intensity,
    width: u32,
    height: u32,
) -> Result<PathBuf> {
    let images = resolve_output_directory(base, IMAGE_SUBFOLDER)?;
    let tier = resolve_output_directory(&images, intensity.name())?;
    resolve_output_directory(&tier, &format!("{width}_{height}"))
}

/// Random alphanumeric file stem of `length` characters
pub fn random_stem<R: Rng + ?Sized>(length: usize, rng: &mut R) -> String {
    (0..length)
        .map(|_| char::from(Alphanumeric.sample(rng)))
        .collect()
}

/// Path in `directory` with a random stem that does not exist yet
///
/// # Errors
///
/// Returns an invalid configuration error when `length` is zero, and a file
/// system error when no free name turns up within
/// [`UNIQUE_NAME_ATTEMPTS`] draws
pub fn generate_unique_filename<R: Rng + ?Sized>(
    directory: &Path,
    extension: ImageExtension,
    length: usize,
    rng: &mut R,
) -> Result<PathBuf> {
    if length == 0 {
        return Err(PoisonError::InvalidConfiguration {
            parameter: "name_length",
            value: length.to_string(),
            reason: "file names need at least one character".to_string(),
        });
    }

    for _ in 0..UNIQUE_NAME_ATTEMPTS {
        let candidate = directory.join(format!("{}.{extension}", random_stem(length, rng)));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    tracing::warn!(
        directory = %directory.display(),
        length,
        attempts = UNIQUE_NAME_ATTEMPTS,
        "no free file name"
    );
    Err(file_system(
        directory,
        "pick unique file name",
        std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("every {length}-character name tried was taken"),
        ),
    ))
}
