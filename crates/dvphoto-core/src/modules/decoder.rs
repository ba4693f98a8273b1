//! Image decoding into an owned RGBA buffer.
//!
//! The format is sniffed from the bytes rather than trusted from the declared
//! MIME type, and decode limits are applied before any pixel allocation.

use std::io::Cursor;

use image::{ImageFormat, ImageReader, Limits};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{DecodedImage, PhotoBlob};

/// Decoder resource limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecoderConfig {
    /// Largest width or height the decoder will allocate for.
    pub max_decode_dimension_px: u32,
    /// Upper bound on decoder allocations, in bytes.
    pub max_alloc_bytes: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_decode_dimension_px: 8192,
            max_alloc_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Errors raised while turning bytes into pixels.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes do not start with any known image signature.
    #[error("image data is not in a recognized format")]
    UnknownFormat,
    /// The bytes are an image, but not JPEG or PNG.
    #[error("image format {0:?} is not supported")]
    Unsupported(ImageFormat),
    /// Reading from the in-memory buffer failed.
    #[error("failed to read image data: {0}")]
    Io(#[from] std::io::Error),
    /// The codec rejected the data or a limit was exceeded.
    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// A raw buffer did not match its dimensions.
    #[error("pixel buffer holds {actual} bytes, expected {width}x{height} RGBA")]
    BufferSize {
        /// Claimed width.
        width: u32,
        /// Claimed height.
        height: u32,
        /// Actual buffer length.
        actual: usize,
    },
}

/// Prepares a limited reader for a JPEG or PNG blob.
fn reader<'a>(
    blob: &'a PhotoBlob,
    config: &DecoderConfig,
) -> Result<ImageReader<Cursor<&'a [u8]>>, DecodeError> {
    let mut reader = ImageReader::new(Cursor::new(blob.bytes())).with_guessed_format()?;

    let format = reader.format().ok_or(DecodeError::UnknownFormat)?;
    if !matches!(format, ImageFormat::Jpeg | ImageFormat::Png) {
        return Err(DecodeError::Unsupported(format));
    }

    let mut limits = Limits::default();
    limits.max_image_width = Some(config.max_decode_dimension_px);
    limits.max_image_height = Some(config.max_decode_dimension_px);
    limits.max_alloc = Some(config.max_alloc_bytes);
    reader.limits(limits);

    Ok(reader)
}

/// Reads width and height from the image header without decoding pixels.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the header cannot be parsed.
pub fn probe_dimensions(
    blob: &PhotoBlob,
    config: &DecoderConfig,
) -> Result<(u32, u32), DecodeError> {
    let dimensions = reader(blob, config)?.into_dimensions()?;
    debug!("Probed dimensions {}x{}", dimensions.0, dimensions.1);
    Ok(dimensions)
}

/// Decodes a blob into an RGBA buffer.
///
/// Either the whole image decodes or an error is returned; partial buffers
/// are never produced.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the bytes are not a decodable JPEG or PNG.
pub fn decode(blob: &PhotoBlob, config: &DecoderConfig) -> Result<DecodedImage, DecodeError> {
    let image = reader(blob, config)?.decode()?;
    let decoded = DecodedImage::from_image(image.into_rgba8());
    debug!("Decoded {}x{} image", decoded.width(), decoded.height());
    Ok(decoded)
}
