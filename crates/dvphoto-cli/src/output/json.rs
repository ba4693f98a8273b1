//! JSON output adapter.

use anyhow::Result;
use dvphoto_core::{PhotoReport, ResultOutput};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// How reports are laid out on the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonLayout {
    /// One compact object per line, written as each photo completes.
    Lines,
    /// A single array, written on flush.
    Array {
        /// Indent the array.
        pretty: bool,
    },
}

/// JSON output adapter.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    layout: JsonLayout,
    pending: Mutex<Vec<PhotoReport>>,
}

impl JsonOutput {
    /// Creates a JSON output writing to `writer`.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, layout: JsonLayout) -> Self {
        Self {
            writer: Mutex::new(writer),
            layout,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Creates a JSON output writing to stdout.
    #[must_use]
    pub fn stdout(layout: JsonLayout) -> Self {
        Self::new(Box::new(io::stdout()), layout)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Box<dyn Write + Send>>> {
        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))
    }

    fn take_pending(&self) -> Vec<PhotoReport> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl ResultOutput for JsonOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &PhotoReport) -> Result<()> {
        match self.layout {
            JsonLayout::Lines => {
                let json = serde_json::to_string(report)?;
                let mut writer = self.lock()?;
                writeln!(writer, "{json}")?;
            }
            JsonLayout::Array { .. } => self
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(report.clone()),
        }
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self.lock()?;
        if let JsonLayout::Array { pretty } = self.layout {
            let reports = self.take_pending();
            let json = if pretty {
                serde_json::to_string_pretty(&reports)?
            } else {
                serde_json::to_string(&reports)?
            };
            writeln!(writer, "{json}")?;
        }
        writer.flush()?;
        Ok(())
    }
}
