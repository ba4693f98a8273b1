//! Core domain types for photo compliance validation.

mod analyzer;
mod blob;
mod decoded;
mod issue;
mod report;
mod result;

pub use analyzer::{BackgroundAnalyzer, FaceDetector, QualityAssessor};
pub use blob::{PhotoBlob, PhotoFormat};
pub use decoded::{rgb_sum, DecodedImage};
pub use issue::{Finding, IssueTag, Severity};
pub use report::{BackgroundReport, ConstraintReport, FaceReport, QualityMetrics, Tone};
pub use result::{ComplianceResult, PhotoMetadata, PhotoReport, MAX_SCORE};
