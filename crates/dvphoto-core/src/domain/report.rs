//! Per-stage reports produced by the analyzers.

use serde::{Deserialize, Serialize};

use super::{Finding, Severity};

/// Outcome of the hard format/size/dimension checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintReport {
    /// Hard violations, in check order.
    pub errors: Vec<Finding>,
    /// Advisory findings that do not reject the photo.
    pub warnings: Vec<Finding>,
}

impl ConstraintReport {
    /// Returns `true` when no hard constraint was violated.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Records a finding under the list its severity belongs to.
    pub fn push(&mut self, finding: Finding) {
        match finding.severity() {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }
}

/// Global image quality metrics, each on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Normalized mean Laplacian response.
    pub sharpness: f64,
    /// Mean grayscale level.
    pub brightness: f64,
    /// Grayscale dynamic range (max - min), not a perceptual measure.
    pub contrast: f64,
}

/// Dominant brightness of the background ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Mean above the light threshold.
    Light,
    /// Mean above the medium threshold.
    Medium,
    /// Everything else.
    Dark,
}

/// Background uniformity estimate from the outer pixel ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundReport {
    /// Ring standard deviation below the plain threshold.
    pub is_plain: bool,
    /// Tone bucket of the ring mean.
    pub dominant_tone: Tone,
    /// Ring standard deviation above the pattern threshold.
    pub has_patterns: bool,
    /// Ring standard deviation inside the shadow band.
    pub has_shadows: bool,
}

/// Face presence estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceReport {
    /// A face was found.
    pub detected: bool,
    /// Number of faces found.
    pub count: u32,
    /// The face sits in the center of the frame.
    pub centered: bool,
    /// Both eyes appear open.
    pub eyes_open: bool,
    /// Expression appears neutral.
    pub neutral_expression: bool,
}

impl FaceReport {
    /// Report for an image without any face.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            detected: false,
            count: 0,
            centered: false,
            eyes_open: false,
            neutral_expression: true,
        }
    }
}
