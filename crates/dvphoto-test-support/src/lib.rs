//! Test support utilities for dvphoto.
//!
//! Provides mocks, synthetic photo builders, and utilities for testing
//! the dvphoto validation pipeline.
//!
//! # Example
//!
//! ```
//! use dvphoto_test_support::{MockPhotoSource, SyntheticPhotoBuilder};
//!
//! // Create synthetic test photos
//! let portrait = SyntheticPhotoBuilder::standard_portrait();
//! let blank = SyntheticPhotoBuilder::blank_photo();
//!
//! // Create mock photo source
//! let source = MockPhotoSource::from_blobs([
//!     ("portrait.png", SyntheticPhotoBuilder::png_blob(&portrait).unwrap()),
//!     ("blank.png", SyntheticPhotoBuilder::png_blob(&blank).unwrap()),
//! ]);
//! ```

mod builders;
mod mocks;

pub use builders::{SyntheticPhotoBuilder, PORTRAIT_BACKGROUND, PORTRAIT_EYES, PORTRAIT_SKIN};
pub use mocks::{
    CountingBackgroundAnalyzer, CountingFaceDetector, CountingQualityAssessor, MockPhotoSource,
    MockProgressSink, MockResultOutput,
};
