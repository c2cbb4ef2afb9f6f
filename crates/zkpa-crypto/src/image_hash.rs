//! # Canonical Image Hashing
//!
//! The digest covers pixel content, not container bytes. Any decodable image
//! is converted to 8-bit RGB (alpha and color profile discarded) and written
//! as a binary PPM stream:
//!
//! ```text
//! b"P6\n" "{width} {height}\n" b"255\n" <row-major RGB bytes>
//! ```
//!
//! The stream is hashed with BLAKE3. The same pixels in PNG, BMP or any other
//! supported container produce the same digest.

use image::RgbImage;

use zkpa_core::{AttestError, ImageDigest};

/// Decode `raw` and return its canonical PPM byte stream.
pub fn canonical_ppm(raw: &[u8]) -> Result<Vec<u8>, AttestError> {
    if raw.is_empty() {
        return Err(AttestError::Decode("image input is empty".into()));
    }
    let decoded = image::load_from_memory(raw)
        .map_err(|e| AttestError::Decode(format!("unsupported or corrupt image: {e}")))?;
    ppm_from_rgb(&decoded.to_rgb8())
}

fn ppm_from_rgb(rgb: &RgbImage) -> Result<Vec<u8>, AttestError> {
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(AttestError::Decode(format!(
            "image has no pixels ({width}x{height})"
        )));
    }
    let header = format!("P6\n{width} {height}\n255\n");
    let pixels = rgb.as_raw();
    let mut out = Vec::with_capacity(header.len() + pixels.len());
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(pixels);
    Ok(out)
}

/// BLAKE3 over an already canonical byte stream.
pub fn hash_bytes(canonical: &[u8]) -> ImageDigest {
    ImageDigest::from_bytes(*blake3::hash(canonical).as_bytes())
}

/// Decode `raw`, canonicalize it, and hash the result.
pub fn hash_image(raw: &[u8]) -> Result<ImageDigest, AttestError> {
    let ppm = canonical_ppm(raw)?;
    let digest = hash_bytes(&ppm);
    tracing::debug!(bytes = raw.len(), canonical_bytes = ppm.len(), digest = %digest, "hashed image");
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn red_pixel() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb([255, 0, 0])))
    }

    #[test]
    fn single_pixel_stream() {
        let png = encode(red_pixel(), ImageFormat::Png);
        let ppm = canonical_ppm(&png).unwrap();
        assert_eq!(ppm, b"P6\n1 1\n255\n\xff\x00\x00");
        assert_eq!(
            hash_image(&png).unwrap().as_bytes(),
            blake3::hash(b"P6\n1 1\n255\n\xff\x00\x00").as_bytes()
        );
    }

    #[test]
    fn container_independent() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(3, 2, |x, y| {
            Rgb([x as u8 * 40, y as u8 * 90, 7])
        }));
        let png = hash_image(&encode(img.clone(), ImageFormat::Png)).unwrap();
        let bmp = hash_image(&encode(img, ImageFormat::Bmp)).unwrap();
        assert_eq!(png, bmp);
    }

    #[test]
    fn alpha_is_discarded() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 17])));
        assert_eq!(
            hash_image(&encode(rgba, ImageFormat::Png)).unwrap(),
            hash_image(&encode(red_pixel(), ImageFormat::Png)).unwrap()
        );
    }

    #[test]
    fn one_bit_change_changes_digest() {
        let a = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])));
        let mut b_img = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
        b_img.put_pixel(1, 1, Rgb([10, 20, 31]));
        let b = DynamicImage::ImageRgb8(b_img);
        assert_ne!(
            hash_image(&encode(a, ImageFormat::Png)).unwrap(),
            hash_image(&encode(b, ImageFormat::Png)).unwrap()
        );
    }

    #[test]
    fn dimensions_are_hashed() {
        let wide = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, Rgb([0, 0, 0])));
        let tall = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 2, Rgb([0, 0, 0])));
        assert_ne!(
            hash_image(&encode(wide, ImageFormat::Png)).unwrap(),
            hash_image(&encode(tall, ImageFormat::Png)).unwrap()
        );
    }

    #[test]
    fn empty_and_garbage_input_fail() {
        assert!(matches!(hash_image(&[]), Err(AttestError::Decode(_))));
        assert!(matches!(
            hash_image(b"definitely not an image"),
            Err(AttestError::Decode(_))
        ));
    }

    #[test]
    fn zero_sized_raster_rejected() {
        assert!(matches!(
            ppm_from_rgb(&RgbImage::new(0, 4)),
            Err(AttestError::Decode(_))
        ));
    }
}
