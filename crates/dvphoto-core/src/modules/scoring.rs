//! Compliance scoring from the analyzer reports.
//!
//! The score starts at 100, every fired condition subtracts its deduction,
//! and the total is clamped to zero only once at the end, so deductions stay
//! additive and independent.

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    BackgroundReport, FaceReport, Finding, IssueTag, QualityMetrics, Severity, MAX_SCORE,
};

/// Points deducted per fired condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeductionTable {
    /// No face detected.
    pub no_face: u32,
    /// More than one face.
    pub multiple_faces: u32,
    /// Face not centered.
    pub face_not_centered: u32,
    /// Eyes not open.
    pub eyes_not_open: u32,
    /// Non-neutral expression.
    pub non_neutral_expression: u32,
    /// Background not plain.
    pub background_not_plain: u32,
    /// Shadows on the background.
    pub shadows: u32,
    /// Sharpness below the minimum.
    pub low_sharpness: u32,
    /// Brightness outside the accepted range.
    pub brightness_out_of_range: u32,
    /// Contrast below the minimum.
    pub low_contrast: u32,
}

impl Default for DeductionTable {
    fn default() -> Self {
        Self {
            no_face: 50,
            multiple_faces: 30,
            face_not_centered: 10,
            eyes_not_open: 15,
            non_neutral_expression: 10,
            background_not_plain: 15,
            shadows: 10,
            low_sharpness: 15,
            brightness_out_of_range: 10,
            low_contrast: 10,
        }
    }
}

impl DeductionTable {
    /// Deduction for a tag. Tags that are not scored return 0.
    #[must_use]
    pub const fn for_tag(&self, tag: IssueTag) -> u32 {
        match tag {
            IssueTag::NoFace => self.no_face,
            IssueTag::MultipleFaces => self.multiple_faces,
            IssueTag::FaceNotCentered => self.face_not_centered,
            IssueTag::EyesNotOpen => self.eyes_not_open,
            IssueTag::NonNeutralExpression => self.non_neutral_expression,
            IssueTag::BackgroundNotPlain => self.background_not_plain,
            IssueTag::ShadowsDetected => self.shadows,
            IssueTag::LowSharpness => self.low_sharpness,
            IssueTag::BrightnessOutOfRange => self.brightness_out_of_range,
            IssueTag::LowContrast => self.low_contrast,
            _ => 0,
        }
    }
}

/// Thresholds and deductions for scoring. Metric thresholds are on 0-100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringConfig {
    /// Sharpness below this is flagged.
    pub min_sharpness: f64,
    /// Brightness below this is flagged.
    pub min_brightness: f64,
    /// Brightness above this is flagged.
    pub max_brightness: f64,
    /// Contrast below this is flagged.
    pub min_contrast: f64,
    /// Per-condition deductions.
    pub deductions: DeductionTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_sharpness: 70.0,
            min_brightness: 40.0,
            max_brightness: 80.0,
            min_contrast: 50.0,
            deductions: DeductionTable::default(),
        }
    }
}

/// Scorer output: the bounded score plus every fired condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreCard {
    /// Score in `0..=100`.
    pub score: u32,
    /// Fired conditions in evaluation order.
    pub findings: Vec<Finding>,
}

impl ScoreCard {
    /// Machine-readable tags.
    #[must_use]
    pub fn issues(&self) -> Vec<IssueTag> {
        self.findings.iter().map(|f| f.tag).collect()
    }

    /// Messages of error-severity findings.
    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.messages(Severity::Error)
    }

    /// Messages of warning-severity findings.
    #[must_use]
    pub fn warnings(&self) -> Vec<&str> {
        self.messages(Severity::Warning)
    }

    /// Advice for every fired condition.
    #[must_use]
    pub fn recommendations(&self) -> Vec<&'static str> {
        self.findings.iter().map(|f| f.tag.recommendation()).collect()
    }

    fn messages(&self, severity: Severity) -> Vec<&str> {
        self.findings
            .iter()
            .filter(|f| f.severity() == severity)
            .map(|f| f.message.as_str())
            .collect()
    }
}

/// Scores the analyzer reports.
#[must_use]
pub fn score(
    quality: &QualityMetrics,
    background: &BackgroundReport,
    face: &FaceReport,
    config: &ScoringConfig,
) -> ScoreCard {
    let mut findings = Vec::new();

    if face.detected {
        if face.count > 1 {
            findings.push(Finding::new(
                IssueTag::MultipleFaces,
                format!("Multiple faces detected ({}); only one person may appear", face.count),
            ));
        }
        if !face.centered {
            findings.push(Finding::new(
                IssueTag::FaceNotCentered,
                "Face is not centered in the frame",
            ));
        }
        if !face.eyes_open {
            findings.push(Finding::new(
                IssueTag::EyesNotOpen,
                "Eyes appear to be closed or not visible",
            ));
        }
        if !face.neutral_expression {
            findings.push(Finding::new(
                IssueTag::NonNeutralExpression,
                "Facial expression does not appear neutral",
            ));
        }
    } else {
        findings.push(Finding::new(IssueTag::NoFace, "No face detected"));
    }

    if !background.is_plain {
        let message = if background.has_patterns {
            "Background is not plain: patterns or objects detected"
        } else {
            "Background is not plain"
        };
        findings.push(Finding::new(IssueTag::BackgroundNotPlain, message));
    }
    if background.has_shadows {
        findings.push(Finding::new(
            IssueTag::ShadowsDetected,
            "Shadows or uneven lighting detected on the background",
        ));
    }

    if quality.sharpness < config.min_sharpness {
        findings.push(Finding::new(
            IssueTag::LowSharpness,
            format!(
                "Photo is not sharp enough (sharpness {:.0}, minimum {:.0})",
                quality.sharpness, config.min_sharpness
            ),
        ));
    }
    if quality.brightness < config.min_brightness || quality.brightness > config.max_brightness {
        findings.push(Finding::new(
            IssueTag::BrightnessOutOfRange,
            format!(
                "Brightness {:.0} is outside the accepted range {:.0}-{:.0}",
                quality.brightness, config.min_brightness, config.max_brightness
            ),
        ));
    }
    if quality.contrast < config.min_contrast {
        findings.push(Finding::new(
            IssueTag::LowContrast,
            format!(
                "Contrast {:.0} is below the minimum {:.0}",
                quality.contrast, config.min_contrast
            ),
        ));
    }

    let deducted: u64 = findings
        .iter()
        .map(|f| u64::from(config.deductions.for_tag(f.tag)))
        .sum();
    let score = u64::from(MAX_SCORE).saturating_sub(deducted);
    debug!("Score: {} fired condition(s), {deducted} deducted, score {score}", findings.len());

    ScoreCard {
        score: u32::try_from(score).unwrap_or(0),
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tone;

    fn good_quality() -> QualityMetrics {
        QualityMetrics {
            sharpness: 90.0,
            brightness: 60.0,
            contrast: 70.0,
        }
    }

    fn plain_background() -> BackgroundReport {
        BackgroundReport {
            is_plain: true,
            dominant_tone: Tone::Light,
            has_patterns: false,
            has_shadows: false,
        }
    }

    fn one_face() -> FaceReport {
        FaceReport {
            detected: true,
            count: 1,
            centered: true,
            eyes_open: true,
            neutral_expression: true,
        }
    }

    fn score_default(q: &QualityMetrics, b: &BackgroundReport, f: &FaceReport) -> ScoreCard {
        score(q, b, f, &ScoringConfig::default())
    }

    /// Analyzer outputs for one photo, starting from a fully passing baseline.
    #[derive(Clone, Copy)]
    struct Sample {
        q: QualityMetrics,
        b: BackgroundReport,
        f: FaceReport,
    }

    impl Sample {
        fn passing() -> Self {
            Self {
                q: good_quality(),
                b: plain_background(),
                f: one_face(),
            }
        }

        fn with(mut self, edit: Edit) -> Self {
            edit(&mut self);
            self
        }

        fn score(&self) -> u32 {
            score_default(&self.q, &self.b, &self.f).score
        }
    }

    type Edit = fn(&mut Sample);

    /// Every single-condition violation of the passing baseline.
    fn single_violations() -> [(IssueTag, Edit); 11] {
        [
            (IssueTag::NoFace, |s| s.f = FaceReport::none()),
            (IssueTag::MultipleFaces, |s| s.f.count = 2),
            (IssueTag::FaceNotCentered, |s| s.f.centered = false),
            (IssueTag::EyesNotOpen, |s| s.f.eyes_open = false),
            (
                IssueTag::NonNeutralExpression,
                |s| s.f.neutral_expression = false,
            ),
            (IssueTag::BackgroundNotPlain, |s| s.b.is_plain = false),
            (IssueTag::ShadowsDetected, |s| s.b.has_shadows = true),
            (IssueTag::LowSharpness, |s| s.q.sharpness = 69.9),
            (IssueTag::BrightnessOutOfRange, |s| s.q.brightness = 39.0),
            (IssueTag::BrightnessOutOfRange, |s| s.q.brightness = 81.0),
            (IssueTag::LowContrast, |s| s.q.contrast = 49.0),
        ]
    }

    #[test]
    fn test_default_deductions() {
        let d = DeductionTable::default();
        assert_eq!(d.for_tag(IssueTag::NoFace), 50);
        assert_eq!(d.for_tag(IssueTag::MultipleFaces), 30);
        assert_eq!(d.for_tag(IssueTag::EyesNotOpen), 15);
        assert_eq!(d.for_tag(IssueTag::FileTooLarge), 0);
        assert_eq!(d.for_tag(IssueTag::ContentTypeMismatch), 0);
    }

    #[test]
    fn test_perfect_photo_scores_100() {
        let card = score_default(&good_quality(), &plain_background(), &one_face());
        assert_eq!(card.score, 100);
        assert!(card.findings.is_empty());
    }

    #[test]
    fn test_each_condition_deducts_its_weight() {
        let table = DeductionTable::default();
        for (tag, edit) in single_violations() {
            let s = Sample::passing().with(edit);
            let card = score_default(&s.q, &s.b, &s.f);
            assert_eq!(card.issues(), [tag], "{tag:?}");
            assert_eq!(card.score, 100 - table.for_tag(tag), "{tag:?}");
        }
    }

    #[test]
    fn test_face_subchecks_skipped_without_face() {
        let card = score_default(&good_quality(), &plain_background(), &FaceReport::none());
        assert_eq!(card.issues(), [IssueTag::NoFace]);
        assert_eq!(card.errors(), ["No face detected"]);
        assert_eq!(card.score, 50);
    }

    #[test]
    fn test_severity_split() {
        let face = FaceReport {
            count: 3,
            eyes_open: false,
            ..one_face()
        };
        let card = score_default(&good_quality(), &plain_background(), &face);
        assert_eq!(card.errors().len(), 1);
        assert!(card.errors()[0].contains("Multiple faces"));
        assert_eq!(card.warnings().len(), 1);
        assert_eq!(card.score, 100 - 30 - 15);
    }

    #[test]
    fn test_brightness_bounds_inclusive() {
        for brightness in [40.0, 80.0] {
            let mut s = Sample::passing();
            s.q.brightness = brightness;
            assert_eq!(s.score(), 100);
        }
        let s = Sample::passing().with(|s| {
            s.q.sharpness = 70.0;
            s.q.contrast = 50.0;
        });
        assert_eq!(s.score(), 100);
    }

    #[test]
    fn test_clamped_at_zero() {
        let config = ScoringConfig {
            deductions: DeductionTable {
                no_face: 90,
                background_not_plain: 90,
                ..DeductionTable::default()
            },
            ..ScoringConfig::default()
        };
        let q = QualityMetrics {
            sharpness: 0.0,
            brightness: 0.0,
            contrast: 0.0,
        };
        let b = BackgroundReport {
            is_plain: false,
            dominant_tone: Tone::Dark,
            has_patterns: true,
            has_shadows: true,
        };
        let card = score(&q, &b, &FaceReport::none(), &config);
        assert_eq!(card.score, 0);
        assert_eq!(card.findings.len(), 6);
    }

    #[test]
    fn test_extreme_deductions_do_not_overflow() {
        let config = ScoringConfig {
            deductions: DeductionTable {
                no_face: u32::MAX,
                low_sharpness: u32::MAX,
                ..DeductionTable::default()
            },
            ..ScoringConfig::default()
        };
        let mut q = good_quality();
        q.sharpness = 0.0;
        let card = score(&q, &plain_background(), &FaceReport::none(), &config);
        assert_eq!(card.score, 0);
    }

    #[test]
    fn test_monotonic_in_added_warnings() {
        // Start from each single violation and add each other warning on top
        let warnings: [Edit; 8] = [
            |s| s.f.centered = false,
            |s| s.f.eyes_open = false,
            |s| s.f.neutral_expression = false,
            |s| s.b.is_plain = false,
            |s| s.b.has_shadows = true,
            |s| s.q.sharpness = 10.0,
            |s| s.q.brightness = 95.0,
            |s| s.q.contrast = 5.0,
        ];

        for (_, edit) in single_violations() {
            let base = Sample::passing().with(edit);
            let before = base.score();
            for add in warnings {
                let after = base.with(add).score();
                assert!(after <= before, "score rose from {before} to {after}");
            }
        }
    }

    #[test]
    fn test_recommendation_for_background() {
        let mut b = plain_background();
        b.is_plain = false;
        b.has_patterns = true;
        let card = score_default(&good_quality(), &b, &one_face());
        assert_eq!(card.recommendations(), ["Use a plain light background"]);
        assert!(card.warnings()[0].contains("patterns"));
    }
}
