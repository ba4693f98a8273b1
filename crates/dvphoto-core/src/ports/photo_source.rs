//! Photo source port for loading photos to validate.

use crate::domain::PhotoBlob;

/// A photo read from a source, with the path it was read from.
#[derive(Debug, Clone)]
pub struct SourcedPhoto {
    /// Where the photo came from.
    pub path: String,
    /// The raw bytes and declared MIME type.
    pub blob: PhotoBlob,
}

/// Port for loading photos from a source.
pub trait PhotoSource: Send + Sync {
    /// Returns an iterator over photos from this source.
    ///
    /// # Errors
    ///
    /// Individual items may be errors if a photo cannot be read.
    fn photos(&self) -> Box<dyn Iterator<Item = anyhow::Result<SourcedPhoto>> + Send + '_>;

    /// Returns the total number of photos, if known.
    fn count_hint(&self) -> Option<usize>;
}
