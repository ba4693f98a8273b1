//! Decoded pixel buffer shared read-only by the analyzers.

use crate::modules::DecodeError;

/// An RGBA pixel buffer owned by a single validation call.
///
/// The buffer is row-major with four samples per pixel and is guaranteed to
/// hold exactly `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    /// Wraps a raw RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::BufferSize`] if the buffer length does not match
    /// the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, DecodeError> {
        let expected = u64::from(width) * u64::from(height) * 4;
        if pixels.len() as u64 != expected {
            return Err(DecodeError::BufferSize {
                width,
                height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Converts an `image` RGBA buffer without copying.
    #[must_use]
    pub fn from_image(image: image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            pixels: image.into_raw(),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len() / 4
    }

    /// Raw RGBA samples.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    /// Iterates pixels as `[r, g, b, a]` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.pixels
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Returns the pixel at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels
            .get(offset..offset + 4)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Sum of the R, G and B samples at `(x, y)` (0..=765).
    ///
    /// Callers divide by three to get the grayscale value; keeping the sum
    /// integral keeps accumulations exact.
    #[must_use]
    pub fn rgb_sum(&self, x: u32, y: u32) -> Option<u32> {
        self.pixel(x, y).map(rgb_sum)
    }
}

/// Sum of the colour channels of one pixel.
#[must_use]
pub fn rgb_sum(pixel: [u8; 4]) -> u32 {
    u32::from(pixel[0]) + u32::from(pixel[1]) + u32::from(pixel[2])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(DecodedImage::from_rgba(2, 2, vec![0; 16]).is_ok());
        let err = DecodedImage::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, DecodeError::BufferSize { actual: 15, .. }));
    }

    #[test]
    fn test_pixel_lookup() {
        let mut raw = vec![0u8; 2 * 2 * 4];
        // (1, 1) is the last pixel
        raw[12..16].copy_from_slice(&[10, 20, 30, 255]);
        let img = DecodedImage::from_rgba(2, 2, raw).unwrap();

        assert_eq!(img.pixel(1, 1), Some([10, 20, 30, 255]));
        assert_eq!(img.rgb_sum(1, 1), Some(60));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel_count(), 4);
    }

    #[test]
    fn test_from_image() {
        let buf = image::RgbaImage::from_pixel(3, 2, image::Rgba([1, 2, 3, 4]));
        let img = DecodedImage::from_image(buf);
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.as_raw().len(), 24);
        assert!(img.pixels().all(|p| p == [1, 2, 3, 4]));
    }
}
