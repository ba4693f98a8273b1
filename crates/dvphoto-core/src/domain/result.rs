//! Terminal validation result types.

use serde::{Deserialize, Serialize};

use super::{Finding, IssueTag, PhotoFormat, Severity};

/// Largest possible compliance score.
pub const MAX_SCORE: u32 = 100;

/// Facts about the submitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Width in pixels, when the header could be read.
    pub width: Option<u32>,
    /// Height in pixels, when the header could be read.
    pub height: Option<u32>,
    /// File size in bytes.
    pub byte_size: u64,
    /// MIME type as declared by the uploader.
    pub format: String,
    /// Format detected from the file contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_format: Option<PhotoFormat>,
}

/// The verdict for one photo.
///
/// `is_valid` is derived from `errors` at construction and the score is
/// clamped to `0..=100`, so neither invariant can be broken afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceResult {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
    compliance_score: u32,
    issues: Vec<IssueTag>,
    recommendations: Vec<String>,
    metadata: PhotoMetadata,
}

impl ComplianceResult {
    /// Builds a result from findings.
    ///
    /// Findings are split into errors and warnings by severity; tags keep
    /// their order and recommendations are deduplicated.
    #[must_use]
    pub fn from_findings(findings: &[Finding], score: u32, metadata: PhotoMetadata) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut issues = Vec::with_capacity(findings.len());
        let mut recommendations: Vec<String> = Vec::new();

        for finding in findings {
            match finding.severity() {
                Severity::Error => errors.push(finding.message.clone()),
                Severity::Warning => warnings.push(finding.message.clone()),
            }
            issues.push(finding.tag);
            let advice = finding.tag.recommendation();
            if !recommendations.iter().any(|r| r == advice) {
                recommendations.push(advice.to_string());
            }
        }

        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            compliance_score: score.min(MAX_SCORE),
            issues,
            recommendations,
            metadata,
        }
    }

    /// `true` iff there are no errors.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Hard errors.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Advisory warnings.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Score in `0..=100`.
    #[must_use]
    pub const fn compliance_score(&self) -> u32 {
        self.compliance_score
    }

    /// Issue tags in the order they were raised.
    #[must_use]
    pub fn issues(&self) -> &[IssueTag] {
        &self.issues
    }

    /// Returns `true` if `tag` was raised.
    #[must_use]
    pub fn has_issue(&self, tag: IssueTag) -> bool {
        self.issues.contains(&tag)
    }

    /// Advice for the applicant.
    #[must_use]
    pub fn recommendations(&self) -> &[String] {
        &self.recommendations
    }

    /// File facts.
    #[must_use]
    pub const fn metadata(&self) -> &PhotoMetadata {
        &self.metadata
    }
}

/// A result tagged with where the photo came from, as written by output adapters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoReport {
    /// Path or name of the photo.
    pub path: String,
    /// Timestamp of validation (ISO 8601).
    pub timestamp: String,
    /// The verdict.
    #[serde(flatten)]
    pub result: ComplianceResult,
}
