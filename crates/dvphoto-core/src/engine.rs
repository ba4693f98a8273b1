//! The photo validation engine.
//!
//! [`PhotoValidator::validate`] runs the whole pipeline for one blob and
//! always returns a [`ComplianceResult`]. Each call owns its decoded buffer
//! and shares nothing mutable with other calls, so one validator can serve
//! concurrent callers.

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    BackgroundAnalyzer, ComplianceResult, DecodedImage, FaceDetector, PhotoBlob, PhotoFormat,
    QualityAssessor,
};
use crate::modules::{
    assemble, assemble_basic, assemble_failure, assemble_rejected, check_constraints, decode,
    photo_metadata, probe_dimensions, score, BackgroundConfig, ConstraintPolicy, DecoderConfig,
    FaceConfig, LaplacianQualityAssessor, QualityConfig, RingBackgroundAnalyzer, ScoreCard,
    ScoringConfig, SkinToneFaceDetector,
};

/// How much of the pipeline to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Constraint checks on metadata and header dimensions only.
    Basic,
    /// Constraint checks followed by pixel analysis and scoring.
    #[default]
    Advanced,
}

/// Every tunable of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationPolicy {
    /// Pipeline depth.
    pub mode: AnalysisMode,
    /// Hard file constraints.
    pub constraints: ConstraintPolicy,
    /// Decoder limits.
    pub decoder: DecoderConfig,
    /// Quality metric calibration.
    pub quality: QualityConfig,
    /// Background bands.
    pub background: BackgroundConfig,
    /// Face heuristic thresholds.
    pub face: FaceConfig,
    /// Scoring thresholds and deductions.
    pub scoring: ScoringConfig,
}

/// Validates photos against a [`ValidationPolicy`].
pub struct PhotoValidator {
    policy: ValidationPolicy,
    quality: Box<dyn QualityAssessor>,
    background: Box<dyn BackgroundAnalyzer>,
    face: Box<dyn FaceDetector>,
}

impl PhotoValidator {
    /// Creates a validator using the built-in analyzers configured from `policy`.
    #[must_use]
    pub fn new(policy: ValidationPolicy) -> Self {
        let quality = Box::new(LaplacianQualityAssessor::new(policy.quality.clone()));
        let background = Box::new(RingBackgroundAnalyzer::new(policy.background.clone()));
        let face = Box::new(SkinToneFaceDetector::new(policy.face.clone()));
        Self {
            policy,
            quality,
            background,
            face,
        }
    }

    /// Replaces the quality assessor.
    #[must_use]
    pub fn with_quality_assessor(mut self, assessor: Box<dyn QualityAssessor>) -> Self {
        self.quality = assessor;
        self
    }

    /// Replaces the background analyzer.
    #[must_use]
    pub fn with_background_analyzer(mut self, analyzer: Box<dyn BackgroundAnalyzer>) -> Self {
        self.background = analyzer;
        self
    }

    /// Replaces the face detector.
    #[must_use]
    pub fn with_face_detector(mut self, detector: Box<dyn FaceDetector>) -> Self {
        self.face = detector;
        self
    }

    /// Returns the active policy.
    #[must_use]
    pub const fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Validates one photo.
    ///
    /// Every constraint is checked in one pass, using header dimensions when
    /// the bytes carry a JPEG or PNG signature. Any constraint failure returns
    /// a score of 0 without decoding pixels or running the analyzers. Decode
    /// and analyzer errors become the generic "Failed to analyze photo" result.
    #[must_use]
    pub fn validate(&self, blob: &PhotoBlob) -> ComplianceResult {
        let dimensions = self.header_dimensions(blob);
        let metadata = photo_metadata(blob, dimensions);

        let report = check_constraints(blob, dimensions, &self.policy.constraints);
        if !report.is_valid() {
            debug!("Rejected before decode: {} error(s)", report.errors.len());
            return assemble_rejected(&report, metadata);
        }

        if dimensions.is_none() {
            return assemble_failure(metadata);
        }

        if self.policy.mode == AnalysisMode::Basic {
            return assemble_basic(&report, metadata);
        }

        match self.analyze(blob) {
            Ok(card) => {
                let result = assemble(&report, &card, metadata);
                info!(
                    "Photo scored {} ({} issue(s), valid={})",
                    result.compliance_score(),
                    result.issues().len(),
                    result.is_valid()
                );
                result
            }
            Err(e) => {
                warn!("Photo analysis failed: {e:#}");
                assemble_failure(metadata)
            }
        }
    }

    /// Reads dimensions from the header of a recognised JPEG or PNG.
    fn header_dimensions(&self, blob: &PhotoBlob) -> Option<(u32, u32)> {
        PhotoFormat::sniff(blob.bytes())?;
        match probe_dimensions(blob, &self.policy.decoder) {
            Ok(dimensions) => Some(dimensions),
            Err(e) => {
                warn!("Failed to read photo header: {e}");
                None
            }
        }
    }

    /// Decodes the blob and runs every analyzer on the same buffer.
    fn analyze(&self, blob: &PhotoBlob) -> anyhow::Result<ScoreCard> {
        let image = decode(blob, &self.policy.decoder).context("Failed to decode photo")?;
        self.analyze_image(&image)
    }

    /// Runs the analyzers and scorer on an already decoded image.
    ///
    /// # Errors
    ///
    /// Returns an error if any analyzer fails.
    pub fn analyze_image(&self, image: &DecodedImage) -> anyhow::Result<ScoreCard> {
        let quality = self
            .quality
            .assess(image)
            .with_context(|| format!("Quality assessor '{}' failed", self.quality.name()))?;
        let background = self
            .background
            .analyze(image)
            .with_context(|| format!("Background analyzer '{}' failed", self.background.name()))?;
        let face = self
            .face
            .detect_face(image)
            .with_context(|| format!("Face detector '{}' failed", self.face.name()))?;

        Ok(score(&quality, &background, &face, &self.policy.scoring))
    }
}

impl Default for PhotoValidator {
    fn default() -> Self {
        Self::new(ValidationPolicy::default())
    }
}
