//! Output pixel modes and file extensions

use crate::io::error::{PoisonError, Result, invalid_configuration};
use image::{DynamicImage, ImageFormat, RgbImage};
use std::fmt;
use std::str::FromStr;

/// Pixel layout of the saved raster
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PixelMode {
    /// 8-bit red, green, blue
    #[default]
    Rgb,
    /// 8-bit red, green, blue with an opaque alpha channel
    Rgba,
    /// 8-bit luminance
    Luma,
}

impl PixelMode {
    /// Number of channels stored per pixel
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
            Self::Luma => 1,
        }
    }

    /// Convert the working canvas into this mode
    pub fn convert(self, canvas: &RgbImage) -> DynamicImage {
        let image = DynamicImage::ImageRgb8(canvas.clone());
        self.coerce(image)
    }

    /// Coerce any decoded image into this mode
    pub fn coerce(self, image: DynamicImage) -> DynamicImage {
        match self {
            Self::Rgb => DynamicImage::ImageRgb8(image.into_rgb8()),
            Self::Rgba => DynamicImage::ImageRgba8(image.into_rgba8()),
            Self::Luma => DynamicImage::ImageLuma8(image.into_luma8()),
        }
    }
}

impl FromStr for PixelMode {
    type Err = PoisonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "RGB" => Ok(Self::Rgb),
            "RGBA" => Ok(Self::Rgba),
            "L" | "LUMA" => Ok(Self::Luma),
            _ => Err(invalid_configuration(
                "pixel_mode",
                &s,
                &"expected one of RGB, RGBA, L",
            )),
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::Luma => "L",
        };
        f.write_str(name)
    }
}

/// Supported raster file extensions
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    /// JPEG with EXIF metadata
    #[default]
    Jpg,
    /// PNG with a text chunk
    Png,
}

impl ImageExtension {
    /// Every supported extension
    pub const ALL: [Self; 2] = [Self::Jpg, Self::Png];

    /// Extension text without the leading dot
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpg => "jpg",
            Self::Png => "png",
        }
    }

    /// Encoder format backing this extension
    pub const fn format(self) -> ImageFormat {
        match self {
            Self::Jpg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }

    /// Whether the encoder can store the given pixel mode
    pub const fn supports(self, mode: PixelMode) -> bool {
        !matches!((self, mode), (Self::Jpg, PixelMode::Rgba))
    }
}

impl FromStr for ImageExtension {
    type Err = PoisonError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ext| ext.as_str() == trimmed)
            .ok_or_else(|| {
                invalid_configuration("extension", &s, &"expected one of jpg, png")
            })
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
