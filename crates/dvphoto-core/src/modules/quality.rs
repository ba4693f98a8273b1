//! Global quality metrics: brightness, contrast and Laplacian sharpness.
//!
//! All accumulation happens in integers over per-pixel `R + G + B` sums and
//! is converted to floating point once at the end, so results are identical
//! across runs for the same buffer.

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use tracing::debug;

use crate::domain::{rgb_sum, DecodedImage, QualityAssessor, QualityMetrics};

/// Configuration for quality assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityConfig {
    /// Mean Laplacian response (grayscale units) that maps to sharpness 100.
    ///
    /// This is a calibration constant for typical phone/webcam photos.
    pub sharpness_normalization: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            sharpness_normalization: 50.0,
        }
    }
}

/// Computes brightness, contrast and sharpness for an image.
#[must_use]
pub fn measure_quality(image: &DecodedImage, config: &QualityConfig) -> QualityMetrics {
    let sums: Vec<u32> = image.pixels().map(rgb_sum).collect();

    let (brightness, contrast) = brightness_and_contrast(&sums);
    let mean_response = mean_laplacian_response(&sums, image.width(), image.height());
    let sharpness = normalize_sharpness(mean_response, config.sharpness_normalization);

    debug!(
        "Quality: sharpness={sharpness:.2} (mean response {mean_response:.2}), brightness={brightness:.2}, contrast={contrast:.2}"
    );

    QualityMetrics {
        sharpness,
        brightness,
        contrast,
    }
}

/// Mean gray level and dynamic range, both scaled to 0-100.
fn brightness_and_contrast(sums: &[u32]) -> (f64, f64) {
    if sums.is_empty() {
        return (0.0, 0.0);
    }

    let mut total = 0u64;
    let mut min = u32::MAX;
    let mut max = 0u32;
    for &s in sums {
        total += u64::from(s);
        min = min.min(s);
        max = max.max(s);
    }

    let mean_gray = total as f64 / (3.0 * sums.len() as f64);
    let brightness = mean_gray / 255.0 * 100.0;
    let contrast = f64::from(max - min) / 3.0 / 255.0 * 100.0;
    (brightness, contrast)
}

/// Mean absolute response of the 4-neighbour Laplacian over interior pixels,
/// in grayscale units. Images narrower or shorter than 3 px have no interior
/// and return 0.
fn mean_laplacian_response(sums: &[u32], width: u32, height: u32) -> f64 {
    if width < 3 || height < 3 {
        return 0.0;
    }
    let w = width as usize;
    let h = height as usize;

    let mut total = 0u64;
    for y in 1..h - 1 {
        let row = y * w;
        for x in 1..w - 1 {
            let i = row + x;
            let center = 4 * i64::from(sums[i]);
            let neighbours = i64::from(sums[i - w])
                + i64::from(sums[i + w])
                + i64::from(sums[i - 1])
                + i64::from(sums[i + 1]);
            total += (center - neighbours).unsigned_abs();
        }
    }

    let interior = ((w - 2) * (h - 2)) as f64;
    total as f64 / 3.0 / interior
}

/// Maps a mean response onto 0-100.
fn normalize_sharpness(mean_response: f64, normalization: f64) -> f64 {
    if normalization <= 0.0 {
        return 0.0;
    }
    (mean_response / normalization * 100.0).min(100.0)
}

/// Laplacian-based quality assessor.
pub struct LaplacianQualityAssessor {
    config: QualityConfig,
}

impl LaplacianQualityAssessor {
    /// Creates an assessor with the given configuration.
    #[must_use]
    pub const fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Returns the assessor configuration.
    #[must_use]
    pub const fn config(&self) -> &QualityConfig {
        &self.config
    }
}

impl Default for LaplacianQualityAssessor {
    fn default() -> Self {
        Self::new(QualityConfig::default())
    }
}

impl QualityAssessor for LaplacianQualityAssessor {
    fn name(&self) -> &'static str {
        "laplacian"
    }

    fn assess(&self, image: &DecodedImage) -> anyhow::Result<QualityMetrics> {
        Ok(measure_quality(image, &self.config))
    }
}
