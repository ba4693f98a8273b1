//! Uploaded photo bytes and their declared format.

use serde::{Deserialize, Serialize};

/// Formats accepted by the photo policy.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoFormat {
    /// JPEG / JFIF.
    Jpeg,
    /// Portable Network Graphics.
    Png,
}

impl PhotoFormat {
    /// Maps a declared MIME type to an accepted format.
    ///
    /// Returns `None` for anything outside the JPEG/PNG whitelist.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Detects the format from leading magic bytes.
    #[must_use]
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Canonical MIME type.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Equivalent `image` crate format.
    #[must_use]
    pub const fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
        }
    }
}

/// An uploaded photo: raw bytes plus the MIME type the uploader declared.
///
/// The engine only ever borrows a blob; it never mutates or persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoBlob {
    bytes: Vec<u8>,
    mime_type: String,
}

impl PhotoBlob {
    /// Creates a blob from bytes and a declared MIME type.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Raw file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// MIME type as declared by the uploader.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Length of the file in bytes.
    #[must_use]
    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Declared format, if it is on the whitelist.
    #[must_use]
    pub fn declared_format(&self) -> Option<PhotoFormat> {
        PhotoFormat::from_mime(&self.mime_type)
    }
}
