//! dvphoto core - photo compliance validation engine
//!
//! Decodes an uploaded photo, checks it against the file policy and, in
//! advanced mode, scores sharpness, lighting, background and face presence.

pub mod domain;
pub mod engine;
pub mod modules;
pub mod ports;

pub use domain::{
    BackgroundAnalyzer, BackgroundReport, ComplianceResult, ConstraintReport, DecodedImage,
    FaceDetector, FaceReport, Finding, IssueTag, PhotoBlob, PhotoFormat, PhotoMetadata,
    PhotoReport, QualityAssessor, QualityMetrics, Severity, Tone,
};
pub use engine::{AnalysisMode, PhotoValidator, ValidationPolicy};
pub use modules::{
    BackgroundConfig, ConstraintPolicy, DeductionTable, DecodeError, DecoderConfig, FaceConfig,
    QualityConfig, ScoreCard, ScoringConfig,
};
pub use ports::{BatchTally, PhotoSource, ProgressEvent, ProgressSink, ResultOutput, SourcedPhoto};
