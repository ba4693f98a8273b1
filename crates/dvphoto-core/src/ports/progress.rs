//! Progress reporting port for batch validation.

use crate::domain::{ComplianceResult, PhotoReport};

/// Running counts for a validation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchTally {
    /// Photos that passed validation.
    pub valid: usize,
    /// Photos that were validated and failed.
    pub invalid: usize,
    /// Files that could not be read.
    pub unreadable: usize,
}

impl BatchTally {
    /// Counts one validated photo.
    pub fn record(&mut self, result: &ComplianceResult) {
        if result.is_valid() {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
    }

    /// Number of photos that reached the validator.
    #[must_use]
    pub const fn checked(&self) -> usize {
        self.valid + self.invalid
    }
}

/// Events emitted while a batch is validated.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// A photo was validated.
    Checked {
        /// The photo's report.
        report: PhotoReport,
        /// Counts including this photo.
        tally: BatchTally,
    },
    /// A file could not be read and was left out of the batch.
    Unreadable {
        /// Read error, naming the file.
        reason: String,
        /// Counts including this file.
        tally: BatchTally,
    },
    /// Every photo has been handled.
    Finished {
        /// Final counts.
        tally: BatchTally,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
