//! Analyzer traits for the pixel-level checks.
//!
//! The engine only talks to these traits, so a heuristic can be replaced by
//! a model-backed implementation without touching scoring or assembly.

use super::{BackgroundReport, DecodedImage, FaceReport, QualityMetrics};

/// Computes global quality metrics.
pub trait QualityAssessor: Send + Sync {
    /// Returns the name of this assessor.
    fn name(&self) -> &'static str;

    /// Measures sharpness, brightness and contrast.
    ///
    /// # Errors
    ///
    /// Returns an error if assessment fails.
    fn assess(&self, image: &DecodedImage) -> anyhow::Result<QualityMetrics>;
}

/// Estimates background uniformity.
pub trait BackgroundAnalyzer: Send + Sync {
    /// Returns the name of this analyzer.
    fn name(&self) -> &'static str;

    /// Classifies the background.
    ///
    /// # Errors
    ///
    /// Returns an error if analysis fails.
    fn analyze(&self, image: &DecodedImage) -> anyhow::Result<BackgroundReport>;
}

/// Estimates face presence and pose.
pub trait FaceDetector: Send + Sync {
    /// Returns the name of this detector.
    fn name(&self) -> &'static str;

    /// Looks for a face.
    ///
    /// # Errors
    ///
    /// Returns an error if detection fails.
    fn detect_face(&self, image: &DecodedImage) -> anyhow::Result<FaceReport>;
}
