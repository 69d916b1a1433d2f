//! Text tags carried inside encoded PNG and JPEG files
//!
//! PNG files are encoded with a `tEXt` chunk written ahead of the image
//! data. JPEG files get an APP1 EXIF segment holding one
//! `ImageDescription` entry, placed after the JFIF header.

use crate::canvas::ImageExtension;
use crate::io::configuration::PNG_TAG_KEYWORD;
use crate::synthesis::profile::Intensity;
use exif::experimental::Writer;
use exif::{Field, In, Reader, Tag, Value};
use image::error::{EncodingError, ImageFormatHint};
use image::{DynamicImage, ImageError, ImageFormat, ImageResult};
use std::borrow::Cow;
use std::io::Cursor;

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_APP0: [u8; 2] = [0xFF, 0xE0];
const JPEG_APP1: [u8; 2] = [0xFF, 0xE1];
const EXIF_HEADER: &[u8; 6] = b"Exif\0\0";

/// Text recorded in every generated image
pub fn mode_tag(intensity: Intensity) -> String {
    format!("mode: {}", intensity.name())
}

fn encoding_error(format: ImageFormat, reason: impl ToString) -> ImageError {
    ImageError::Encoding(EncodingError::new(
        ImageFormatHint::Exact(format),
        reason.to_string(),
    ))
}

/// Encode `image` as `extension` with `text` embedded
///
/// # Errors
///
/// Returns the encoder's error, or an encoding error when the tag does not
/// fit in a single JPEG segment
pub fn encode_tagged(
    image: &DynamicImage,
    extension: ImageExtension,
    text: &str,
) -> ImageResult<Vec<u8>> {
    match extension {
        ImageExtension::Png => {
            encode_png(image, text).map_err(|e| encoding_error(ImageFormat::Png, e))
        }
        ImageExtension::Jpg => {
            let mut encoded = Cursor::new(Vec::new());
            image.write_to(&mut encoded, ImageFormat::Jpeg)?;
            embed_jpeg_description(encoded.get_ref(), text)
        }
    }
}

fn encode_png(image: &DynamicImage, text: &str) -> Result<Vec<u8>, png::EncodingError> {
    let (color, samples): (png::ColorType, Cow<'_, [u8]>) = match image {
        DynamicImage::ImageLuma8(gray) => {
            (png::ColorType::Grayscale, Cow::Borrowed(gray.as_raw().as_slice()))
        }
        DynamicImage::ImageRgba8(rgba) => {
            (png::ColorType::Rgba, Cow::Borrowed(rgba.as_raw().as_slice()))
        }
        DynamicImage::ImageRgb8(rgb) => (png::ColorType::Rgb, Cow::Borrowed(rgb.as_raw().as_slice())),
        other => (png::ColorType::Rgb, Cow::Owned(other.to_rgb8().into_raw())),
    };

    let mut bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.add_text_chunk(PNG_TAG_KEYWORD.to_string(), text.to_string())?;

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&samples)?;
    writer.finish()?;
    Ok(bytes)
}

/// Splice an EXIF `ImageDescription` into an encoded JPEG
///
/// # Errors
///
/// Returns an encoding error when the bytes are not a JPEG stream or the
/// text is too long for one APP1 segment
pub fn embed_jpeg_description(encoded: &[u8], text: &str) -> ImageResult<Vec<u8>> {
    if !encoded.starts_with(&JPEG_SOI) {
        return Err(encoding_error(ImageFormat::Jpeg, "not a JPEG stream"));
    }

    // JFIF readers expect APP0 to stay directly after SOI
    let mut insert_at = JPEG_SOI.len();
    if encoded.get(2..4) == Some(&JPEG_APP0[..]) {
        let app0 = encoded
            .get(4..6)
            .and_then(|len| <[u8; 2]>::try_from(len).ok())
            .map_or(0, |len| usize::from(u16::from_be_bytes(len)));
        if app0 >= 2 && insert_at + 2 + app0 <= encoded.len() {
            insert_at += 2 + app0;
        }
    }

    let field = Field {
        tag: Tag::ImageDescription,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    };
    let mut writer = Writer::new();
    writer.push_field(&field);
    let mut tiff = Cursor::new(Vec::new());
    writer
        .write(&mut tiff, false)
        .map_err(|e| encoding_error(ImageFormat::Jpeg, e))?;

    let payload = [EXIF_HEADER.as_slice(), tiff.get_ref().as_slice()].concat();
    let length = u16::try_from(payload.len() + 2)
        .map_err(|_| encoding_error(ImageFormat::Jpeg, "description exceeds one APP1 segment"))?;

    let (head, tail) = encoded.split_at(insert_at);
    Ok([
        head,
        JPEG_APP1.as_slice(),
        length.to_be_bytes().as_slice(),
        payload.as_slice(),
        tail,
    ]
    .concat())
}

/// Find the text written by [`encode_tagged`], if any
pub fn read_text_tag(encoded: &[u8], extension: ImageExtension) -> Option<String> {
    match extension {
        ImageExtension::Png => {
            let reader = png::Decoder::new(Cursor::new(encoded)).read_info().ok()?;
            reader
                .info()
                .uncompressed_latin1_text
                .iter()
                .find(|chunk| chunk.keyword == PNG_TAG_KEYWORD)
                .map(|chunk| chunk.text.clone())
        }
        ImageExtension::Jpg => {
            let exif = Reader::new()
                .read_from_container(&mut Cursor::new(encoded))
                .ok()?;
            match &exif.get_field(Tag::ImageDescription, In::PRIMARY)?.value {
                Value::Ascii(parts) => parts
                    .first()
                    .map(|part| String::from_utf8_lossy(part).into_owned()),
                _ => None,
            }
        }
    }
}
