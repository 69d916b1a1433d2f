//! Tests for pixel mode and extension parsing and conversion

#[cfg(test)]
mod tests {
    use image::{DynamicImage, Rgb, RgbImage};
    use poisonpix::PoisonError;
    use poisonpix::canvas::{ImageExtension, PixelMode};

    // Tests pixel mode names parse case-insensitively
    // Verified by removing the uppercase normalization
    #[test]
    fn test_pixel_mode_parsing() {
        assert_eq!("rgb".parse::<PixelMode>().ok(), Some(PixelMode::Rgb));
        assert_eq!("RGBA".parse::<PixelMode>().ok(), Some(PixelMode::Rgba));
        assert_eq!("l".parse::<PixelMode>().ok(), Some(PixelMode::Luma));
        assert_eq!("Luma".parse::<PixelMode>().ok(), Some(PixelMode::Luma));

        let error = "CMYK".parse::<PixelMode>();
        assert!(matches!(
            error,
            Err(PoisonError::InvalidConfiguration {
                parameter: "pixel_mode",
                ..
            })
        ));
    }

    // Tests channel counts match each layout
    // Verified by swapping the RGBA and RGB channel counts
    #[test]
    fn test_pixel_mode_channels() {
        assert_eq!(PixelMode::Rgb.channels(), 3);
        assert_eq!(PixelMode::Rgba.channels(), 4);
        assert_eq!(PixelMode::Luma.channels(), 1);
    }

    // Tests canvas conversion keeps dimensions and switches layout
    // Verified by returning the RGB canvas unchanged for every mode
    #[test]
    fn test_convert_canvas() {
        let canvas = RgbImage::from_pixel(5, 3, Rgb([255, 255, 255]));

        let luma = PixelMode::Luma.convert(&canvas);
        assert!(matches!(luma, DynamicImage::ImageLuma8(_)));
        assert_eq!((luma.width(), luma.height()), (5, 3));
        assert_eq!(luma.as_bytes().first(), Some(&255));

        let rgba = PixelMode::Rgba.convert(&canvas);
        assert!(matches!(rgba, DynamicImage::ImageRgba8(_)));
        assert_eq!(rgba.as_bytes().len(), 5 * 3 * 4);
    }

    // Tests extensions parse with or without a leading dot
    // Verified by removing the dot stripping
    #[test]
    fn test_extension_parsing() {
        assert_eq!(".PNG".parse::<ImageExtension>().ok(), Some(ImageExtension::Png));
        assert_eq!("jpg".parse::<ImageExtension>().ok(), Some(ImageExtension::Jpg));
        assert!("gif".parse::<ImageExtension>().is_err());
        assert_eq!(ImageExtension::Png.to_string(), "png");
        assert_eq!(ImageExtension::default(), ImageExtension::Jpg);
    }

    // Tests JPEG output refuses an alpha channel
    // Verified by allowing every mode for every extension
    #[test]
    fn test_extension_mode_support() {
        assert!(!ImageExtension::Jpg.supports(PixelMode::Rgba));
        assert!(ImageExtension::Jpg.supports(PixelMode::Luma));
        assert!(ImageExtension::Png.supports(PixelMode::Rgba));
    }
}
