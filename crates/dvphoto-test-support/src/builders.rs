//! Synthetic photo builders for testing.

use std::io::Cursor;

use dvphoto_core::domain::{DecodedImage, PhotoBlob};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Background gray used by [`SyntheticPhotoBuilder::portrait`].
pub const PORTRAIT_BACKGROUND: u8 = 180;
/// Skin tone used by [`SyntheticPhotoBuilder::portrait`].
pub const PORTRAIT_SKIN: [u8; 3] = [220, 170, 140];
/// Eye color used by [`SyntheticPhotoBuilder::portrait`].
pub const PORTRAIT_EYES: [u8; 3] = [20, 20, 20];

/// Builder for creating synthetic test photos.
///
/// Provides convenience methods for generating photos with specific
/// characteristics (plain, patterned, face-like, etc.) and for encoding
/// them into upload blobs.
pub struct SyntheticPhotoBuilder;

impl SyntheticPhotoBuilder {
    // === Flat Photos ===

    /// Creates a uniform gray photo (no edges, no face).
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([value, value, value]))
    }

    /// Creates a uniform color photo.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb([r, g, b]))
    }

    // === Patterned Photos ===

    /// Creates a black and white checkerboard (very sharp edges, busy background).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> RgbImage {
        let cell_size = cell_size.max(1);
        RgbImage::from_fn(width, height, |x, y| {
            if (x / cell_size + y / cell_size) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    /// Creates deterministic pseudo-random noise.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn noise(width: u32, height: u32, seed: u64) -> RgbImage {
        let mut state = seed | 1;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        };
        RgbImage::from_fn(width, height, |_, _| Rgb([next(), next(), next()]))
    }

    // === Face-like Photos ===

    /// Creates a face-like portrait: a skin-tone block filling the central 40%
    /// on a plain light-gray background, with two dark eye blocks.
    ///
    /// At 800x800 the eyes cover about 7% of the central window.
    #[must_use]
    pub fn portrait(width: u32, height: u32) -> RgbImage {
        let (x0, y0, rw, rh) = (width * 3 / 10, height * 3 / 10, width * 2 / 5, height * 2 / 5);
        let eye_w = rw * 3 / 16;
        let eye_h = rh * 3 / 16;
        let eye_y = y0 + rh / 4;
        let left_eye_x = x0 + rw / 5;
        let right_eye_x = x0 + rw * 3 / 5;

        let within = |v: u32, start: u32, len: u32| v >= start && v < start + len;

        RgbImage::from_fn(width, height, |x, y| {
            let in_face = within(x, x0, rw) && within(y, y0, rh);
            let in_eye = within(y, eye_y, eye_h)
                && (within(x, left_eye_x, eye_w) || within(x, right_eye_x, eye_w));
            if in_face && in_eye {
                Rgb(PORTRAIT_EYES)
            } else if in_face {
                Rgb(PORTRAIT_SKIN)
            } else {
                Rgb([PORTRAIT_BACKGROUND; 3])
            }
        })
    }

    // === Conversions ===

    /// Converts a synthetic photo into the engine's decoded RGBA form.
    #[must_use]
    pub fn to_decoded(img: &RgbImage) -> DecodedImage {
        DecodedImage::from_image(DynamicImage::ImageRgb8(img.clone()).to_rgba8())
    }

    /// Encodes a photo as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn png_bytes(img: &RgbImage) -> anyhow::Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// Encodes a photo as JPEG bytes at the given quality (1-100).
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn jpeg_bytes(img: &RgbImage, quality: u8) -> anyhow::Result<Vec<u8>> {
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, quality).encode_image(img)?;
        Ok(buf)
    }

    /// Encodes a photo as a PNG upload.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn png_blob(img: &RgbImage) -> anyhow::Result<PhotoBlob> {
        Ok(PhotoBlob::new(Self::png_bytes(img)?, "image/png"))
    }

    /// Encodes a photo as a JPEG upload at the given quality (1-100).
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn jpeg_blob(img: &RgbImage, quality: u8) -> anyhow::Result<PhotoBlob> {
        Ok(PhotoBlob::new(Self::jpeg_bytes(img, quality)?, "image/jpeg"))
    }
}

/// Convenience functions for common test photos.
impl SyntheticPhotoBuilder {
    /// Returns an 800x800 face-like portrait.
    #[must_use]
    pub fn standard_portrait() -> RgbImage {
        Self::portrait(800, 800)
    }

    /// Returns an 800x800 mid-gray photo without a face.
    #[must_use]
    pub fn blank_photo() -> RgbImage {
        Self::uniform_gray(800, 800, 128)
    }
}
