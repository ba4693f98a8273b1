//! Heuristic face presence check.
//!
//! This is a colour-statistics stand-in for a real detector: it counts
//! skin-tone-like and dark pixels in a centered window and infers a face from
//! their ratios. It cannot count faces, locate them off-center or judge
//! expression; swap it out through [`FaceDetector`] for production use.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use serde::Serialize;
use tracing::debug;

use crate::domain::{DecodedImage, FaceDetector, FaceReport};

/// Configuration for the skin-tone face heuristic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceConfig {
    /// Width and height of the sampled center window, as a fraction of the image.
    pub center_region_fraction: f64,
    /// Red must exceed this for a skin pixel.
    pub skin_min_red: u8,
    /// Green must exceed this for a skin pixel.
    pub skin_min_green: u8,
    /// Blue must exceed this for a skin pixel.
    pub skin_min_blue: u8,
    /// Red must exceed green by more than this for a skin pixel.
    pub skin_min_red_green_gap: u8,
    /// All channels below this make a dark pixel.
    pub dark_max_channel: u8,
    /// Skin ratio above which a face is assumed.
    pub min_skin_ratio: f64,
    /// Dark ratio above which facial features are assumed.
    pub min_dark_ratio: f64,
    /// Dark ratio above which eyes are assumed open.
    pub eyes_open_min_dark_ratio: f64,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            center_region_fraction: 0.4,
            skin_min_red: 95,
            skin_min_green: 40,
            skin_min_blue: 20,
            skin_min_red_green_gap: 15,
            dark_max_channel: 50,
            min_skin_ratio: 0.10,
            min_dark_ratio: 0.05,
            eyes_open_min_dark_ratio: 0.02,
        }
    }
}

impl FaceConfig {
    /// Returns `true` if the pixel looks like skin.
    #[must_use]
    pub fn is_skin(&self, [r, g, b, _]: [u8; 4]) -> bool {
        r > self.skin_min_red
            && g > self.skin_min_green
            && b > self.skin_min_blue
            && r > g
            && r > b
            && r - g > self.skin_min_red_green_gap
    }

    /// Returns `true` if every colour channel is below the dark threshold.
    #[must_use]
    pub fn is_dark(&self, [r, g, b, _]: [u8; 4]) -> bool {
        r < self.dark_max_channel && g < self.dark_max_channel && b < self.dark_max_channel
    }
}

/// Pixel ratios inside the center window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterSample {
    /// Pixels in the window.
    pub pixels: u64,
    /// Fraction of skin-tone pixels.
    pub skin_ratio: f64,
    /// Fraction of dark pixels.
    pub dark_ratio: f64,
}

impl CenterSample {
    /// Samples the centered window of `image`.
    #[must_use]
    pub fn from_image(image: &DecodedImage, config: &FaceConfig) -> Self {
        let (x0, y0, rw, rh) =
            center_window(image.width(), image.height(), config.center_region_fraction);

        let mut skin = 0u64;
        let mut dark = 0u64;
        for y in y0..y0 + rh {
            for x in x0..x0 + rw {
                if let Some(px) = image.pixel(x, y) {
                    if config.is_skin(px) {
                        skin += 1;
                    }
                    if config.is_dark(px) {
                        dark += 1;
                    }
                }
            }
        }

        let pixels = u64::from(rw) * u64::from(rh);
        if pixels == 0 {
            return Self {
                pixels,
                skin_ratio: 0.0,
                dark_ratio: 0.0,
            };
        }

        Self {
            pixels,
            skin_ratio: skin as f64 / pixels as f64,
            dark_ratio: dark as f64 / pixels as f64,
        }
    }

    /// Turns the ratios into a report.
    #[must_use]
    pub fn to_report(self, config: &FaceConfig) -> FaceReport {
        let detected =
            self.skin_ratio > config.min_skin_ratio && self.dark_ratio > config.min_dark_ratio;

        FaceReport {
            detected,
            count: u32::from(detected),
            // Only the center is inspected, so a detected face is a centered one
            centered: detected,
            eyes_open: self.dark_ratio > config.eyes_open_min_dark_ratio,
            neutral_expression: true,
        }
    }
}

/// Origin and size of the centered window covering `fraction` of each axis.
fn center_window(width: u32, height: u32, fraction: f64) -> (u32, u32, u32, u32) {
    let fraction = fraction.clamp(0.0, 1.0);
    let span = |len: u32| {
        if len == 0 {
            0
        } else {
            ((f64::from(len) * fraction) as u32).clamp(1, len)
        }
    };
    let rw = span(width);
    let rh = span(height);
    ((width - rw) / 2, (height - rh) / 2, rw, rh)
}

/// Skin-tone heuristic face detector.
pub struct SkinToneFaceDetector {
    config: FaceConfig,
}

impl SkinToneFaceDetector {
    /// Creates a detector with the given configuration.
    #[must_use]
    pub const fn new(config: FaceConfig) -> Self {
        Self { config }
    }
}

impl Default for SkinToneFaceDetector {
    fn default() -> Self {
        Self::new(FaceConfig::default())
    }
}

impl FaceDetector for SkinToneFaceDetector {
    fn name(&self) -> &'static str {
        "skin_tone"
    }

    fn detect_face(&self, image: &DecodedImage) -> anyhow::Result<FaceReport> {
        let sample = CenterSample::from_image(image, &self.config);
        let report = sample.to_report(&self.config);
        debug!(
            "Face heuristic: {} px, skin_ratio={:.3}, dark_ratio={:.3}, detected={}",
            sample.pixels, sample.skin_ratio, sample.dark_ratio, report.detected
        );
        Ok(report)
    }
}
