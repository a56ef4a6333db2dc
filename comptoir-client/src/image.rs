//! Client-side image preprocessing
//!
//! Catalog photos are decoded, downscaled and re-encoded locally before
//! upload. Pure computation: for a given input and the fixed quality/size
//! parameters the output byte stream is deterministic (modulo encoder
//! version).

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};

use crate::error::{ClientError, ClientResult};

/// Maximum accepted input size (10MB, before compression)
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum output width; taller-than-wide images scale by the same ratio
const MAX_WIDTH: u32 = 1200;

/// JPEG quality for catalog images (80% keeps storefront photos crisp
/// while controlling file size)
const JPEG_QUALITY: u8 = 80;

/// Re-encoded image ready for upload.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Validate, downscale and re-encode an image as JPEG.
///
/// Accepts JPEG and PNG input. Output width is capped at [`MAX_WIDTH`]
/// with the aspect ratio preserved; smaller images are never upscaled.
pub fn prepare_image(data: &[u8]) -> ClientResult<PreparedImage> {
    if data.len() > MAX_FILE_SIZE {
        return Err(ClientError::Validation(format!(
            "L'image est trop volumineuse (max {}MB)",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    match image::guess_format(data) {
        Ok(ImageFormat::Jpeg | ImageFormat::Png) => {}
        _ => {
            return Err(ClientError::Validation(
                "Format non supporté. Veuillez utiliser JPG ou PNG.".into(),
            ));
        }
    }

    let img = image::load_from_memory(data)
        .map_err(|e| ClientError::Validation(format!("Image invalide: {e}")))?;

    let (width, height) = scaled_dimensions(img.width(), img.height());
    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    Ok(PreparedImage {
        bytes: encode_jpeg(&img)?,
        width,
        height,
    })
}

/// Proportional target size, cap at [`MAX_WIDTH`].
fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width <= MAX_WIDTH {
        return (width, height);
    }
    let scaled_height = (height as f64 * MAX_WIDTH as f64 / width as f64).round() as u32;
    (MAX_WIDTH, scaled_height.max(1))
}

fn encode_jpeg(img: &DynamicImage) -> ClientResult<Vec<u8>> {
    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| ClientError::InvalidResponse(format!("JPEG encode failed: {e}")))?;
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 30, 200]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn wide_image_is_capped_at_max_width_keeping_ratio() {
        let prepared = prepare_image(&png_bytes(2400, 1200)).unwrap();
        assert_eq!((prepared.width, prepared.height), (1200, 600));

        let decoded = image::load_from_memory(&prepared.bytes).unwrap();
        assert_eq!(image::guess_format(&prepared.bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!((decoded.width(), decoded.height()), (1200, 600));
    }

    #[test]
    fn small_image_is_not_upscaled() {
        let prepared = prepare_image(&png_bytes(300, 500)).unwrap();
        assert_eq!((prepared.width, prepared.height), (300, 500));
    }

    #[test]
    fn reencoding_is_deterministic_for_the_same_input() {
        let input = png_bytes(1600, 900);
        let first = prepare_image(&input).unwrap();
        let second = prepare_image(&input).unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[test]
    fn unsupported_format_is_rejected_before_decode() {
        let bmp = b"BM\x00\x00\x00\x00";
        assert!(matches!(
            prepare_image(bmp),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn oversized_input_is_rejected() {
        let oversized = vec![0u8; MAX_FILE_SIZE + 1];
        assert!(matches!(
            prepare_image(&oversized),
            Err(ClientError::Validation(_))
        ));
    }
}
