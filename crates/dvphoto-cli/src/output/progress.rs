//! Terminal progress adapter using indicatif.

use dvphoto_core::{BatchTally, PhotoReport, ProgressEvent, ProgressSink};
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress reporting for `dvphoto check`.
///
/// With a bar, the message tracks how many photos passed and failed so far.
/// Without one, each invalid photo gets a one-line summary on stderr.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates the progress reporter.
    ///
    /// `total` sizes the bar when known. `quiet` silences everything, and
    /// `show_bar` picks the bar over per-photo lines.
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        let bar = (show_bar && !quiet).then(|| {
            let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);
            if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, quiet }
    }

    fn advance(&self, tally: &BatchTally) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
            bar.set_message(tally_message(tally));
        }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Checked { report, tally } => {
                self.advance(&tally);
                if self.bar.is_none() && !report.result.is_valid() {
                    eprintln!("{}", invalid_line(&report));
                }
            }
            ProgressEvent::Unreadable { reason, tally } => {
                self.advance(&tally);
                eprintln!("WARN: Skipping {reason}");
            }
            ProgressEvent::Finished { tally } => {
                if let Some(bar) = &self.bar {
                    bar.finish_with_message(format!("done, {}", tally_message(&tally)));
                }
            }
        }
    }
}

fn tally_message(tally: &BatchTally) -> String {
    let mut message = format!("{} valid, {} invalid", tally.valid, tally.invalid);
    if tally.unreadable > 0 {
        message.push_str(&format!(", {} unreadable", tally.unreadable));
    }
    message
}

fn invalid_line(report: &PhotoReport) -> String {
    let result = &report.result;
    format!(
        "{}: invalid, score {} ({})",
        report.path,
        result.compliance_score(),
        result.errors().join("; ")
    )
}
