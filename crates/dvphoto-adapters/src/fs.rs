//! Filesystem adapter for loading photos.

use anyhow::{Context, Result};
use dvphoto_core::{PhotoBlob, PhotoSource, SourcedPhoto};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Image extensions picked up from disk and the MIME type each is declared as.
///
/// Only JPEG and PNG pass validation; the others are still loaded so the
/// engine can reject them with an explicit format error.
const IMAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

/// Filesystem photo source adapter.
pub struct FsPhotoSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsPhotoSource {
    /// Creates a new filesystem photo source.
    ///
    /// # Arguments
    ///
    /// * `paths` - Files or directories to scan
    /// * `recursive` - Whether to recurse into subdirectories
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Collects all image files from the configured paths.
    fn collect_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                if mime_for_path(path).is_some() {
                    files.push(path.clone());
                } else {
                    warn!("Unsupported file type: {}", path.display());
                }
            } else if path.is_dir() {
                self.collect_from_dir(path, &mut files);
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files
    }

    fn collect_from_dir(&self, dir: &Path, files: &mut Vec<PathBuf>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read directory {}: {e}", dir.display());
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
        paths.sort();

        for path in paths {
            if path.is_file() && mime_for_path(&path).is_some() {
                files.push(path);
            } else if path.is_dir() && self.recursive {
                self.collect_from_dir(&path, files);
            }
        }
    }
}

impl PhotoSource for FsPhotoSource {
    fn photos(&self) -> Box<dyn Iterator<Item = Result<SourcedPhoto>> + Send + '_> {
        let files = self.collect_files();
        debug!("Found {} photo files", files.len());

        Box::new(files.into_iter().map(|path| load_photo(&path)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.collect_files().len())
    }
}

/// Returns the MIME type declared for a path's extension, if it is an image.
#[must_use]
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Reads a photo from the filesystem without decoding it.
fn load_photo(path: &Path) -> Result<SourcedPhoto> {
    let mime = mime_for_path(path)
        .with_context(|| format!("Unsupported file type: {}", path.display()))?;
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read photo: {}", path.display()))?;

    Ok(SourcedPhoto {
        path: path.to_string_lossy().into_owned(),
        blob: PhotoBlob::new(bytes, mime),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("test.jpg")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("test.JPEG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("test.png")), Some("image/png"));
        assert_eq!(mime_for_path(Path::new("test.gif")), Some("image/gif"));
        assert_eq!(mime_for_path(Path::new("test.HEIC")), Some("image/heic"));
        assert_eq!(mime_for_path(Path::new("test.txt")), None);
        assert_eq!(mime_for_path(Path::new("test")), None);
    }
}
