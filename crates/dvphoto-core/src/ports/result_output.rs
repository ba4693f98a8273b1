//! Result output port for writing validation reports.

use crate::domain::PhotoReport;

/// Port for outputting validation reports.
pub trait ResultOutput: Send + Sync {
    /// Writes a single validation report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, report: &PhotoReport) -> anyhow::Result<()>;

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
