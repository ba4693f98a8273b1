//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the validation core and external adapters.

mod photo_source;
mod progress;
mod result_output;

pub use photo_source::{PhotoSource, SourcedPhoto};
pub use progress::{BatchTally, ProgressEvent, ProgressSink};
pub use result_output::ResultOutput;
