//! Tests for text tags written into PNG and JPEG files

#[cfg(test)]
mod tests {
    use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use poisonpix::canvas::ImageExtension;
    use poisonpix::io::metadata::{embed_jpeg_description, encode_tagged, mode_tag, read_text_tag};
    use poisonpix::synthesis::Intensity;
    use std::io::Cursor;

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([30, 60, 90])))
    }

    // Tests the tag text names the tier
    // Verified by using the Display of the profile instead of the tier
    #[test]
    fn test_mode_tag() {
        assert_eq!(mode_tag(Intensity::Light), "mode: light");
        assert_eq!(mode_tag(Intensity::Heavy), "mode: heavy");
    }

    // Tests PNG tags are readable and the pixels survive
    // Verified by dropping the text chunk from the encoder
    #[test]
    fn test_png_tag_round_trip() {
        let tagged = encode_tagged(&sample(), ImageExtension::Png, "mode: medium").expect("encode");

        assert_eq!(
            read_text_tag(&tagged, ImageExtension::Png).as_deref(),
            Some("mode: medium")
        );
        let decoded = image::load_from_memory(&tagged).expect("tagged PNG decodes");
        assert_eq!(decoded.into_rgb8().get_pixel(3, 5), &Rgb([30, 60, 90]));
    }

    // Tests grayscale and RGBA inputs keep their channel layout
    // Verified by converting every input to RGB
    #[test]
    fn test_png_keeps_color_type() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([77])));
        let tagged = encode_tagged(&gray, ImageExtension::Png, "g").expect("encode gray");
        assert_eq!(image::load_from_memory(&tagged).expect("decode").color().channel_count(), 1);

        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 4])));
        let tagged = encode_tagged(&rgba, ImageExtension::Png, "a").expect("encode rgba");
        assert_eq!(image::load_from_memory(&tagged).expect("decode").color().channel_count(), 4);
        assert_eq!(read_text_tag(&tagged, ImageExtension::Png).as_deref(), Some("a"));
    }

    // Tests JPEG tags decode and keep the SOI marker first
    // Verified by appending the segment after the image data
    #[test]
    fn test_jpeg_tag_round_trip() {
        let tagged = encode_tagged(&sample(), ImageExtension::Jpg, "mode: light").expect("encode");

        assert_eq!(tagged.get(..2), Some(&[0xFF, 0xD8][..]));
        assert_eq!(
            read_text_tag(&tagged, ImageExtension::Jpg).as_deref(),
            Some("mode: light")
        );

        let decoded = image::load_from_memory(&tagged).expect("tagged JPEG decodes");
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    // Tests descriptions short enough for the IFD value field
    // Verified by always writing an offset
    #[test]
    fn test_jpeg_short_description() {
        let tagged = encode_tagged(&sample(), ImageExtension::Jpg, "abc").expect("encode");
        assert_eq!(read_text_tag(&tagged, ImageExtension::Jpg).as_deref(), Some("abc"));
    }

    // Tests streams of the wrong format are rejected
    // Verified by skipping the SOI check
    #[test]
    fn test_wrong_format_rejected() {
        let png = encode_tagged(&sample(), ImageExtension::Png, "x").expect("encode");
        assert!(embed_jpeg_description(&png, "x").is_err());
        assert!(read_text_tag(b"not an image", ImageExtension::Png).is_none());

        let mut plain = Cursor::new(Vec::new());
        sample()
            .write_to(&mut plain, image::ImageFormat::Png)
            .expect("encode untagged");
        assert!(read_text_tag(plain.get_ref(), ImageExtension::Png).is_none());
    }
}
