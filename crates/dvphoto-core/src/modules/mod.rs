//! Validation pipeline stages.
//!
//! Constraint checks and decoding are free functions; the pixel analyzers
//! implement the traits in [`crate::domain`] so they can be swapped.

mod assembler;
mod background;
mod constraints;
mod decoder;
mod face;
mod quality;
mod scoring;

pub use assembler::{
    assemble, assemble_basic, assemble_failure, assemble_rejected, photo_metadata,
    ANALYSIS_FAILED_MESSAGE,
};
pub use background::{BackgroundConfig, RingBackgroundAnalyzer, RingStats};
pub use constraints::{check_constraints, ConstraintPolicy};
pub use decoder::{decode, probe_dimensions, DecodeError, DecoderConfig};
pub use face::{CenterSample, FaceConfig, SkinToneFaceDetector};
pub use quality::{measure_quality, LaplacianQualityAssessor, QualityConfig};
pub use scoring::{score, DeductionTable, ScoreCard, ScoringConfig};
