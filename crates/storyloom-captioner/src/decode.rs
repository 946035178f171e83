// SPDX-FileCopyrightText: 2026 Storyloom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upload decoding and pixel normalization.
//!
//! Uploaded bytes are decoded against their declared format and normalized
//! to interleaved RGB8, the channel order the captioning boundary expects.
//! Decode failures are per-image: the caller skips the image and continues
//! with the rest of the batch.

use image::ImageFormat;

use storyloom_core::StoryloomError;
use storyloom_core::types::{DecodedImage, UploadFormat, UploadedImage};

/// Decode an uploaded image into an RGB8 pixel buffer.
///
/// The declared format is authoritative: bytes that do not parse as that
/// format are rejected even if they happen to be a valid image of another
/// format.
pub fn decode_upload(upload: &UploadedImage) -> Result<DecodedImage, StoryloomError> {
    let format = match upload.format {
        UploadFormat::Png => ImageFormat::Png,
        UploadFormat::Jpeg => ImageFormat::Jpeg,
    };

    let dynamic = image::load_from_memory_with_format(&upload.bytes, format).map_err(|e| {
        StoryloomError::ImageDecode {
            name: upload.name.clone(),
            detail: e.to_string(),
        }
    })?;

    let rgb = dynamic.to_rgb8();
    Ok(DecodedImage {
        width: rgb.width(),
        height: rgb.height(),
        pixels: rgb.into_raw(),
    })
}

/// Re-encode an RGB8 pixel buffer as JPEG for the captioning wire format.
pub fn encode_jpeg(image: &DecodedImage) -> Result<Vec<u8>, StoryloomError> {
    let mut buf = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, 90);
    encoder
        .encode(
            &image.pixels,
            image.width,
            image.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| StoryloomError::Internal(format!("JPEG encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_bytes(format: ImageFormat) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([10, 120, 200]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut cursor, format)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn decodes_png_upload_to_rgb8() {
        let upload = UploadedImage {
            name: "test.png".into(),
            format: UploadFormat::Png,
            bytes: encoded_bytes(ImageFormat::Png),
        };
        let decoded = decode_upload(&upload).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 4);
        assert_eq!(decoded.pixels.len(), 4 * 4 * 3);
        // PNG is lossless, so the pixel values survive the round trip.
        assert_eq!(&decoded.pixels[..3], &[10, 120, 200]);
    }

    #[test]
    fn decodes_jpeg_upload() {
        let upload = UploadedImage {
            name: "test.jpg".into(),
            format: UploadFormat::Jpeg,
            bytes: encoded_bytes(ImageFormat::Jpeg),
        };
        let decoded = decode_upload(&upload).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 4);
    }

    #[test]
    fn garbage_bytes_produce_image_decode_error() {
        let upload = UploadedImage {
            name: "broken.png".into(),
            format: UploadFormat::Png,
            bytes: vec![0xde, 0xad, 0xbe, 0xef],
        };
        let err = decode_upload(&upload).unwrap_err();
        match err {
            StoryloomError::ImageDecode { name, .. } => assert_eq!(name, "broken.png"),
            other => panic!("expected ImageDecode, got {other:?}"),
        }
    }

    #[test]
    fn declared_format_mismatch_is_rejected() {
        // Valid PNG bytes declared as JPEG must not decode.
        let upload = UploadedImage {
            name: "mislabeled.jpg".into(),
            format: UploadFormat::Jpeg,
            bytes: encoded_bytes(ImageFormat::Png),
        };
        assert!(decode_upload(&upload).is_err());
    }

    #[test]
    fn encode_jpeg_round_trips_through_decoder() {
        let decoded = DecodedImage {
            width: 4,
            height: 4,
            pixels: vec![128; 4 * 4 * 3],
        };
        let jpeg = encode_jpeg(&decoded).unwrap();
        let reparsed = image::load_from_memory_with_format(&jpeg, ImageFormat::Jpeg).unwrap();
        assert_eq!(reparsed.width(), 4);
        assert_eq!(reparsed.height(), 4);
    }
}
