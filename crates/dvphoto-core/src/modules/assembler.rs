//! Merges constraint and scoring output into the terminal result.

use crate::domain::{
    ComplianceResult, ConstraintReport, Finding, IssueTag, PhotoBlob, PhotoFormat, PhotoMetadata,
    MAX_SCORE,
};

use super::ScoreCard;

/// Message used for any decode or analysis failure.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Failed to analyze photo";

/// Collects the file facts for the result.
#[must_use]
pub fn photo_metadata(blob: &PhotoBlob, dimensions: Option<(u32, u32)>) -> PhotoMetadata {
    PhotoMetadata {
        width: dimensions.map(|(w, _)| w),
        height: dimensions.map(|(_, h)| h),
        byte_size: blob.byte_size(),
        format: blob.mime_type().to_string(),
        detected_format: PhotoFormat::sniff(blob.bytes()),
    }
}

fn constraint_findings(report: &ConstraintReport) -> Vec<Finding> {
    report
        .errors
        .iter()
        .chain(&report.warnings)
        .cloned()
        .collect()
}

/// Result for a photo that failed the constraint checks. Always scores 0.
#[must_use]
pub fn assemble_rejected(report: &ConstraintReport, metadata: PhotoMetadata) -> ComplianceResult {
    ComplianceResult::from_findings(&constraint_findings(report), 0, metadata)
}

/// Result for constraint-only validation: 100 when the photo passes, 0 otherwise.
#[must_use]
pub fn assemble_basic(report: &ConstraintReport, metadata: PhotoMetadata) -> ComplianceResult {
    let score = if report.is_valid() { MAX_SCORE } else { 0 };
    ComplianceResult::from_findings(&constraint_findings(report), score, metadata)
}

/// Result combining constraint findings with the pixel-analysis score card.
///
/// Constraint findings come first. A constraint failure forces the score to 0.
#[must_use]
pub fn assemble(
    report: &ConstraintReport,
    card: &ScoreCard,
    metadata: PhotoMetadata,
) -> ComplianceResult {
    let mut findings = constraint_findings(report);
    findings.extend(card.findings.iter().cloned());
    let score = if report.is_valid() { card.score } else { 0 };
    ComplianceResult::from_findings(&findings, score, metadata)
}

/// Result for a photo whose decode or analysis failed.
#[must_use]
pub fn assemble_failure(metadata: PhotoMetadata) -> ComplianceResult {
    let finding = Finding::new(IssueTag::AnalysisFailed, ANALYSIS_FAILED_MESSAGE);
    ComplianceResult::from_findings(&[finding], 0, metadata)
}
