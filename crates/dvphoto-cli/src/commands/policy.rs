//! Policy command - print the effective validation policy.

use anyhow::Result;
use clap::Args;
use dvphoto_core::{AnalysisMode, ValidationPolicy};

use crate::config::AppConfig;

/// Parse a strictly positive number.
fn parse_positive(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} must be greater than 0"))
    }
}

/// Flags that override the validation policy.
#[derive(Args, Clone, Default)]
pub struct PolicyArgs {
    /// Only check format, size and dimensions (no pixel analysis)
    #[arg(long)]
    pub basic: bool,

    /// Maximum file size in bytes
    #[arg(long, value_name = "BYTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_file_size: Option<u64>,

    /// Minimum width and height in pixels
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    pub min_dimension: Option<u32>,

    /// Maximum width and height in pixels
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_dimension: Option<u32>,

    /// Mean Laplacian response that maps to sharpness 100
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub sharpness_normalization: Option<f64>,
}

impl PolicyArgs {
    /// Builds the policy: CLI flags over config file values over defaults.
    pub fn policy(&self, config: &AppConfig) -> Result<ValidationPolicy> {
        let mut policy = config.policy();

        if self.basic {
            policy.mode = AnalysisMode::Basic;
        }
        if let Some(bytes) = self.max_file_size {
            policy.constraints.max_file_size_bytes = bytes;
        }
        if let Some(px) = self.min_dimension {
            policy.constraints.min_dimension_px = px;
        }
        if let Some(px) = self.max_dimension {
            policy.constraints.max_dimension_px = px;
        }
        if let Some(n) = self.sharpness_normalization {
            policy.quality.sharpness_normalization = n;
        }

        let c = &policy.constraints;
        if c.min_dimension_px > c.max_dimension_px {
            anyhow::bail!(
                "Minimum dimension {} exceeds maximum dimension {}",
                c.min_dimension_px,
                c.max_dimension_px
            );
        }

        Ok(policy)
    }
}

/// Run the policy command.
pub fn run(args: &PolicyArgs, config: &AppConfig) -> Result<()> {
    let policy = args.policy(config)?;
    println!("{}", serde_json::to_string_pretty(&policy)?);
    Ok(())
}
