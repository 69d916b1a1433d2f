//! Tagged raster export and array round trips for the noise stage

use crate::canvas::{ImageExtension, PixelMode};
use crate::io::error::{PoisonError, Result, file_system, invalid_configuration};
use crate::io::metadata::encode_tagged;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::Array3;
use std::path::Path;

/// Encode `image` as `extension`, embed `tag`, and write it to `path`
///
/// # Errors
///
/// Returns an export error if encoding fails and a file system error if
/// the bytes cannot be written
pub fn save_raster(
    image: &DynamicImage,
    path: &Path,
    extension: ImageExtension,
    tag: &str,
) -> Result<()> {
    let tagged =
        encode_tagged(image, extension, tag).map_err(|e| PoisonError::ImageExport {
            path: path.to_path_buf(),
            source: e,
        })?;
    std::fs::write(path, &tagged).map_err(|e| file_system(path, "write image", e))?;

    tracing::debug!(path = %path.display(), bytes = tagged.len(), "saved raster");
    Ok(())
}

/// Decode the file at `path` into a `(height, width, channels)` array
///
/// The decoded image is coerced to `mode` first, so the channel count is
/// always `mode.channels()`.
///
/// # Errors
///
/// Returns an image load error if the file cannot be opened or decoded
pub fn load_raster(path: &Path, mode: PixelMode) -> Result<Array3<u8>> {
    let decoded = image::open(path).map_err(|e| PoisonError::ImageLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    let image = mode.coerce(decoded);

    let channels = mode.channels();
    let shape = (image.height() as usize, image.width() as usize, channels);
    let raw = image.into_bytes();

    Array3::from_shape_vec(shape, raw)
        .map_err(|e| invalid_configuration("raster", &format!("{shape:?}"), &e))
}

/// Rebuild an image of `mode` from a `(height, width, channels)` array
///
/// # Errors
///
/// Returns an invalid configuration error when the channel axis does not
/// match `mode` or the dimensions overflow `u32`
pub fn raster_to_image(raster: &Array3<u8>, mode: PixelMode) -> Result<DynamicImage> {
    let (height, width, channels) = raster.dim();
    if channels != mode.channels() {
        return Err(invalid_configuration(
            "raster",
            &format!("{channels} channels"),
            &format!("{mode} needs {}", mode.channels()),
        ));
    }

    let height = u32::try_from(height).map_err(|e| invalid_configuration("height", &height, &e))?;
    let width = u32::try_from(width).map_err(|e| invalid_configuration("width", &width, &e))?;
    let samples: Vec<u8> = raster.iter().copied().collect();

    let image = match mode {
        PixelMode::Rgb => RgbImage::from_raw(width, height, samples).map(DynamicImage::ImageRgb8),
        PixelMode::Rgba => RgbaImage::from_raw(width, height, samples).map(DynamicImage::ImageRgba8),
        PixelMode::Luma => GrayImage::from_raw(width, height, samples).map(DynamicImage::ImageLuma8),
    };

    image.ok_or_else(|| {
        invalid_configuration("raster", &format!("{width}x{height}"), &"sample count mismatch")
    })
}
