//! CLI command definitions and handlers.

pub mod check;
pub mod policy;

use clap::{Parser, Subcommand};

/// dvphoto - Photo compliance checker for visa lottery applications
#[derive(Parser)]
#[command(name = "dvphoto")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared check arguments (paths, limits, flags).
    #[command(flatten)]
    pub check: check::CheckArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Validate photos against the compliance policy
    Check(check::CheckArgs),
    /// Print the effective validation policy as JSON
    Policy(policy::PolicyArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every photo is valid.
    Success = 0,
    /// At least one photo is invalid.
    IssuesFound = 1,
    /// The command could not run.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
