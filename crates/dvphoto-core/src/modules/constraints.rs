//! Hard format, size and dimension constraints.
//!
//! These checks only look at the blob's declared metadata and, when known,
//! the header dimensions. They run before any pixel decode.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use tracing::debug;

use crate::domain::{ConstraintReport, Finding, IssueTag, PhotoBlob, PhotoFormat};

const MIB: u64 = 1024 * 1024;

/// Photo file policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintPolicy {
    /// Largest accepted file, in bytes.
    pub max_file_size_bytes: u64,
    /// Smallest accepted width and height.
    pub min_dimension_px: u32,
    /// Largest accepted width and height.
    pub max_dimension_px: u32,
    /// Allowed deviation of `width / height` from 1.0.
    pub aspect_ratio_tolerance: f64,
}

impl Default for ConstraintPolicy {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * MIB,
            min_dimension_px: 600,
            max_dimension_px: 1200,
            aspect_ratio_tolerance: 0.01,
        }
    }
}

/// Checks a blob against the policy.
///
/// Every violated constraint is reported; the checks do not stop at the first
/// failure. Dimension and aspect checks only run when `dimensions` is known.
#[must_use]
pub fn check_constraints(
    blob: &PhotoBlob,
    dimensions: Option<(u32, u32)>,
    policy: &ConstraintPolicy,
) -> ConstraintReport {
    let mut report = ConstraintReport::default();

    let declared = blob.declared_format();
    if declared.is_none() {
        report.push(Finding::new(
            IssueTag::UnsupportedFormat,
            format!(
                "Unsupported format '{}': only JPEG and PNG photos are accepted",
                blob.mime_type()
            ),
        ));
    }

    if blob.byte_size() > policy.max_file_size_bytes {
        report.push(Finding::new(
            IssueTag::FileTooLarge,
            format!(
                "File too large: {} exceeds the maximum of {}",
                format_size(blob.byte_size()),
                format_size(policy.max_file_size_bytes)
            ),
        ));
    }

    if let Some((width, height)) = dimensions {
        let in_range = |v: u32| (policy.min_dimension_px..=policy.max_dimension_px).contains(&v);
        if !in_range(width) || !in_range(height) {
            report.push(Finding::new(
                IssueTag::DimensionsOutOfRange,
                format!(
                    "Dimensions out of range: {width}x{height} px, width and height must be between {} and {} px",
                    policy.min_dimension_px, policy.max_dimension_px
                ),
            ));
        }

        if !is_square(width, height, policy.aspect_ratio_tolerance) {
            report.push(Finding::new(
                IssueTag::NotSquare,
                format!("Photo must be square: {width}x{height} px"),
            ));
        }
    }

    if let (Some(declared), Some(actual)) = (declared, PhotoFormat::sniff(blob.bytes())) {
        if declared != actual {
            report.push(Finding::new(
                IssueTag::ContentTypeMismatch,
                format!(
                    "File is declared as {} but its contents are {}",
                    declared.mime(),
                    actual.mime()
                ),
            ));
        }
    }

    debug!(
        "Constraint check: {} error(s), {} warning(s)",
        report.errors.len(),
        report.warnings.len()
    );
    report
}

/// Aspect ratio check with tolerance. Zero height is never square.
fn is_square(width: u32, height: u32, tolerance: f64) -> bool {
    if height == 0 {
        return false;
    }
    let ratio = f64::from(width) / f64::from(height);
    (ratio - 1.0).abs() <= tolerance
}

/// Formats a byte count in MB (base 1024) followed by the exact byte count.
fn format_size(bytes: u64) -> String {
    format!("{:.1} MB ({bytes} bytes)", bytes as f64 / MIB as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn tags(report: &ConstraintReport) -> Vec<IssueTag> {
        report.errors.iter().map(|f| f.tag).collect()
    }

    #[test]
    fn test_default_policy() {
        let policy = ConstraintPolicy::default();
        assert_eq!(policy.max_file_size_bytes, 5_242_880);
        assert_eq!(policy.min_dimension_px, 600);
        assert_eq!(policy.max_dimension_px, 1200);
    }

    #[test]
    fn test_valid_photo_has_no_errors() {
        let blob = PhotoBlob::new(JPEG_MAGIC.to_vec(), "image/jpeg");
        let report = check_constraints(&blob, Some((800, 800)), &ConstraintPolicy::default());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_dimension_bounds_are_inclusive() {
        let blob = PhotoBlob::new(PNG_MAGIC.to_vec(), "image/png");
        let policy = ConstraintPolicy::default();

        assert!(check_constraints(&blob, Some((600, 600)), &policy).is_valid());
        assert!(check_constraints(&blob, Some((1200, 1200)), &policy).is_valid());
        assert_eq!(
            tags(&check_constraints(&blob, Some((599, 599)), &policy)),
            [IssueTag::DimensionsOutOfRange]
        );
        assert_eq!(
            tags(&check_constraints(&blob, Some((1201, 1201)), &policy)),
            [IssueTag::DimensionsOutOfRange]
        );
    }

    #[test]
    fn test_unsupported_format() {
        let blob = PhotoBlob::new(b"GIF89a".to_vec(), "image/gif");
        let report = check_constraints(&blob, None, &ConstraintPolicy::default());
        assert_eq!(tags(&report), [IssueTag::UnsupportedFormat]);
        assert!(report.errors[0].message.contains("image/gif"));
    }

    #[test]
    fn test_too_large_echoes_limit() {
        let blob = PhotoBlob::new(vec![0u8; 6 * 1024 * 1024], "image/jpeg");
        let report = check_constraints(&blob, None, &ConstraintPolicy::default());
        assert_eq!(tags(&report), [IssueTag::FileTooLarge]);
        assert!(report.errors[0].message.contains("5.0 MB"), "{}", report.errors[0].message);
        assert!(report.errors[0].message.contains("6.0 MB"));
    }

    #[test]
    fn test_one_byte_over_limit_shows_exact_sizes() {
        let blob = PhotoBlob::new(vec![0u8; 5 * 1024 * 1024 + 1], "image/jpeg");
        let report = check_constraints(&blob, None, &ConstraintPolicy::default());
        assert_eq!(
            report.errors[0].message,
            "File too large: 5.0 MB (5242881 bytes) exceeds the maximum of 5.0 MB (5242880 bytes)"
        );
    }

    #[test]
    fn test_small_limit_keeps_byte_count() {
        assert_eq!(format_size(1000), "0.0 MB (1000 bytes)");
    }

    #[test]
    fn test_exact_size_limit_passes() {
        let policy = ConstraintPolicy {
            max_file_size_bytes: 16,
            ..Default::default()
        };
        let blob = PhotoBlob::new(vec![0u8; 16], "image/jpeg");
        assert!(check_constraints(&blob, None, &policy).is_valid());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let blob = PhotoBlob::new(vec![0u8; 6 * 1024 * 1024], "image/bmp");
        let report = check_constraints(&blob, Some((300, 200)), &ConstraintPolicy::default());
        assert_eq!(
            tags(&report),
            [
                IssueTag::UnsupportedFormat,
                IssueTag::FileTooLarge,
                IssueTag::DimensionsOutOfRange,
                IssueTag::NotSquare,
            ]
        );
    }

    #[test]
    fn test_not_square() {
        let blob = PhotoBlob::new(JPEG_MAGIC.to_vec(), "image/jpeg");
        let report = check_constraints(&blob, Some((800, 700)), &ConstraintPolicy::default());
        assert_eq!(tags(&report), [IssueTag::NotSquare]);
    }

    #[test]
    fn test_aspect_tolerance() {
        assert!(is_square(1000, 1000, 0.0));
        assert!(is_square(1005, 1000, 0.01));
        assert!(!is_square(1011, 1000, 0.01));
        assert!(!is_square(10, 0, 1.0));
    }

    #[test]
    fn test_content_type_mismatch_is_warning() {
        let blob = PhotoBlob::new(PNG_MAGIC.to_vec(), "image/jpeg");
        let report = check_constraints(&blob, Some((800, 800)), &ConstraintPolicy::default());
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].tag, IssueTag::ContentTypeMismatch);
    }
}
