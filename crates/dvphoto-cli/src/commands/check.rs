//! Check command - validate photos for compliance issues.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use dvphoto_adapters::FsPhotoSource;
use dvphoto_core::{
    BatchTally, PhotoReport, PhotoSource, PhotoValidator, ProgressEvent, ProgressSink,
    ResultOutput,
};
use tracing::{debug, info};

use super::policy::PolicyArgs;
use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonLayout, JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Shared arguments for photo validation.
#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Files or directories to validate
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Policy overrides
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        // Policy sections are resolved in `validator`
        args.config = Some(config.clone());

        args
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or(OutputFormat::Jsonl)
    }

    /// Builds the validator from CLI flags over the merged config.
    fn validator(&self) -> Result<PhotoValidator> {
        let default_config = AppConfig::default();
        let config = self.config.as_ref().unwrap_or(&default_config);
        let policy = self.policy.policy(config)?;
        debug!("Validation policy: {policy:?}");
        Ok(PhotoValidator::new(policy))
    }
}

/// Outcome of a `dvphoto check` run.
#[derive(Debug)]
pub struct CheckResult {
    /// Per-batch counts.
    pub tally: BatchTally,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CheckArgs) -> Result<CheckResult> {
    info!("Running check command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let validator = args.validator()?;

    let source = FsPhotoSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let layout = match args.format() {
        OutputFormat::Jsonl => JsonLayout::Lines,
        OutputFormat::Json => JsonLayout::Array {
            pretty: args.pretty,
        },
    };
    let output = JsonOutput::stdout(layout);

    process_photos(&source, &validator, &output, &progress_bar)
}

/// Validates every photo from the source and writes one report per photo.
///
/// Unreadable files are reported to `progress` and left out of the output.
/// The exit code reflects validity only.
fn process_photos(
    source: &dyn PhotoSource,
    validator: &PhotoValidator,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
) -> Result<CheckResult> {
    let mut tally = BatchTally::default();

    for photo in source.photos() {
        let photo = match photo {
            Ok(photo) => photo,
            Err(e) => {
                tally.unreadable += 1;
                progress.on_event(ProgressEvent::Unreadable {
                    reason: format!("{e:#}"),
                    tally,
                });
                continue;
            }
        };

        let result = validator.validate(&photo.blob);
        tally.record(&result);
        debug!("{}: score {}", photo.path, result.compliance_score());

        let report = PhotoReport {
            path: photo.path,
            timestamp: iso_timestamp(),
            result,
        };
        output.write(&report)?;
        progress.on_event(ProgressEvent::Checked { report, tally });
    }

    output.flush()?;
    progress.on_event(ProgressEvent::Finished { tally });

    let exit_code = if tally.invalid > 0 {
        ExitCode::IssuesFound
    } else {
        ExitCode::Success
    };

    Ok(CheckResult { tally, exit_code })
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
