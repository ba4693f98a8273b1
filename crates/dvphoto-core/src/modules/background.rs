//! Background uniformity from the outer pixel ring.
//!
//! Only the outermost row and column on each side are sampled, on the
//! assumption that a centered subject does not touch the frame.
//!
//! The plain, shadow and pattern bands are evaluated independently with
//! strict inequalities, so they may overlap (a ring with standard deviation
//! 17 is both plain and shadowed under the default bands).

#![allow(clippy::cast_precision_loss)]

use serde::Serialize;
use tracing::debug;

use crate::domain::{BackgroundAnalyzer, BackgroundReport, DecodedImage, Tone};

/// Configuration for background analysis. Values are on the 0-255 gray scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundConfig {
    /// Standard deviation below which the background is plain.
    pub plain_max_std_dev: f64,
    /// Standard deviation above which the background is patterned.
    pub pattern_min_std_dev: f64,
    /// Lower bound (exclusive) of the shadow band.
    pub shadow_min_std_dev: f64,
    /// Upper bound (exclusive) of the shadow band.
    pub shadow_max_std_dev: f64,
    /// Mean above which the tone is light.
    pub light_min_mean: f64,
    /// Mean above which the tone is medium.
    pub medium_min_mean: f64,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            plain_max_std_dev: 20.0,
            pattern_min_std_dev: 30.0,
            shadow_min_std_dev: 15.0,
            shadow_max_std_dev: 30.0,
            light_min_mean: 200.0,
            medium_min_mean: 100.0,
        }
    }
}

/// Gray-level statistics of the border ring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingStats {
    /// Number of sampled pixels.
    pub samples: usize,
    /// Mean gray level.
    pub mean: f64,
    /// Population standard deviation of the gray level.
    pub std_dev: f64,
}

impl RingStats {
    /// Samples every border pixel exactly once.
    #[must_use]
    pub fn from_image(image: &DecodedImage) -> Self {
        let sums = ring_sums(image);
        if sums.is_empty() {
            return Self {
                samples: 0,
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let n = sums.len() as f64;
        let total: u64 = sums.iter().map(|&s| u64::from(s)).sum();
        let mean = total as f64 / 3.0 / n;
        let variance = sums
            .iter()
            .map(|&s| {
                let diff = f64::from(s) / 3.0 - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;

        Self {
            samples: sums.len(),
            mean,
            std_dev: variance.sqrt(),
        }
    }

    /// Applies the configured bands.
    #[must_use]
    pub fn classify(&self, config: &BackgroundConfig) -> BackgroundReport {
        let dominant_tone = if self.mean > config.light_min_mean {
            Tone::Light
        } else if self.mean > config.medium_min_mean {
            Tone::Medium
        } else {
            Tone::Dark
        };

        BackgroundReport {
            is_plain: self.std_dev < config.plain_max_std_dev,
            dominant_tone,
            has_patterns: self.std_dev > config.pattern_min_std_dev,
            has_shadows: self.std_dev > config.shadow_min_std_dev
                && self.std_dev < config.shadow_max_std_dev,
        }
    }
}

/// Collects `R + G + B` for the top row, bottom row and the remaining
/// left/right column pixels, without visiting a corner twice.
fn ring_sums(image: &DecodedImage) -> Vec<u32> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let mut coords: Vec<(u32, u32)> = (0..w).map(|x| (x, 0)).collect();
    if h > 1 {
        coords.extend((0..w).map(|x| (x, h - 1)));
    }
    for y in 1..h.saturating_sub(1) {
        coords.push((0, y));
        if w > 1 {
            coords.push((w - 1, y));
        }
    }

    coords
        .into_iter()
        .filter_map(|(x, y)| image.rgb_sum(x, y))
        .collect()
}

/// Border-ring background analyzer.
pub struct RingBackgroundAnalyzer {
    config: BackgroundConfig,
}

impl RingBackgroundAnalyzer {
    /// Creates an analyzer with the given configuration.
    #[must_use]
    pub const fn new(config: BackgroundConfig) -> Self {
        Self { config }
    }
}

impl Default for RingBackgroundAnalyzer {
    fn default() -> Self {
        Self::new(BackgroundConfig::default())
    }
}

impl BackgroundAnalyzer for RingBackgroundAnalyzer {
    fn name(&self) -> &'static str {
        "ring"
    }

    fn analyze(&self, image: &DecodedImage) -> anyhow::Result<BackgroundReport> {
        let stats = RingStats::from_image(image);
        let report = stats.classify(&self.config);
        debug!(
            "Background ring: {} samples, mean={:.2}, std_dev={:.2} -> {:?}",
            stats.samples, stats.mean, stats.std_dev, report
        );
        Ok(report)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn image_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> DecodedImage {
        let buf = image::RgbaImage::from_fn(width, height, |x, y| {
            let v = f(x, y);
            image::Rgba([v, v, v, 255])
        });
        DecodedImage::from_image(buf)
    }

    fn stats(std_dev: f64, mean: f64) -> RingStats {
        RingStats {
            samples: 100,
            mean,
            std_dev,
        }
    }

    #[test]
    fn test_ring_sample_count() {
        let img = image_from_fn(10, 8, |_, _| 0);
        assert_eq!(RingStats::from_image(&img).samples, 2 * 10 + 2 * 6);

        assert_eq!(RingStats::from_image(&image_from_fn(1, 1, |_, _| 0)).samples, 1);
        assert_eq!(RingStats::from_image(&image_from_fn(1, 5, |_, _| 0)).samples, 5);
        assert_eq!(RingStats::from_image(&image_from_fn(5, 1, |_, _| 0)).samples, 5);
        assert_eq!(RingStats::from_image(&image_from_fn(2, 2, |_, _| 0)).samples, 4);
    }

    #[test]
    fn test_interior_is_ignored() {
        // Noisy interior, flat border
        let img = image_from_fn(20, 20, |x, y| {
            if x == 0 || y == 0 || x == 19 || y == 19 {
                220
            } else if (x + y) % 2 == 0 {
                0
            } else {
                255
            }
        });
        let s = RingStats::from_image(&img);
        assert_eq!(s.std_dev, 0.0);
        assert!((s.mean - 220.0).abs() < 1e-9);

        let report = s.classify(&BackgroundConfig::default());
        assert!(report.is_plain);
        assert!(!report.has_patterns);
        assert!(!report.has_shadows);
        assert_eq!(report.dominant_tone, Tone::Light);
    }

    #[test]
    fn test_striped_border_is_patterned() {
        let img = image_from_fn(40, 40, |x, y| if (x + y) % 2 == 0 { 0 } else { 255 });
        let report = RingBackgroundAnalyzer::default().analyze(&img).unwrap();
        assert!(!report.is_plain);
        assert!(report.has_patterns);
        assert!(!report.has_shadows);
    }

    #[test]
    fn test_tone_buckets() {
        let config = BackgroundConfig::default();
        assert_eq!(stats(0.0, 230.0).classify(&config).dominant_tone, Tone::Light);
        assert_eq!(stats(0.0, 200.0).classify(&config).dominant_tone, Tone::Medium);
        assert_eq!(stats(0.0, 150.0).classify(&config).dominant_tone, Tone::Medium);
        assert_eq!(stats(0.0, 100.0).classify(&config).dominant_tone, Tone::Dark);
        assert_eq!(stats(0.0, 10.0).classify(&config).dominant_tone, Tone::Dark);
    }

    #[test]
    fn test_band_boundaries() {
        let config = BackgroundConfig::default();

        let r = stats(15.0, 128.0).classify(&config);
        assert!(r.is_plain && !r.has_shadows && !r.has_patterns);

        // Overlapping plain + shadow band
        let r = stats(17.0, 128.0).classify(&config);
        assert!(r.is_plain && r.has_shadows && !r.has_patterns);

        let r = stats(20.0, 128.0).classify(&config);
        assert!(!r.is_plain && r.has_shadows && !r.has_patterns);

        // Exactly 30 falls outside every band
        let r = stats(30.0, 128.0).classify(&config);
        assert!(!r.is_plain && !r.has_shadows && !r.has_patterns);

        let r = stats(30.5, 128.0).classify(&config);
        assert!(!r.is_plain && !r.has_shadows && r.has_patterns);
    }

    #[test]
    fn test_known_std_dev() {
        // Top row 100, everything else on the ring 140 -> two-valued distribution
        let img = image_from_fn(4, 3, |_, y| if y == 0 { 100 } else { 140 });
        let s = RingStats::from_image(&img);
        // 10 samples: 4 at 100, 6 at 140; mean 124, variance 384
        assert_eq!(s.samples, 10);
        assert!((s.mean - 124.0).abs() < 1e-9);
        assert!((s.std_dev - 384f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_empty_image() {
        let img = DecodedImage::from_rgba(0, 0, Vec::new()).unwrap();
        let s = RingStats::from_image(&img);
        assert_eq!(s.samples, 0);
        assert!(s.classify(&BackgroundConfig::default()).is_plain);
    }
}
