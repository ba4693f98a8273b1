//! dvphoto CLI - Photo compliance checker for visa lottery applications.

use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::check::CheckArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Check(args)) => run_check(args, &config),
        Some(Commands::Policy(ref args)) => match commands::policy::run(args, &config) {
            Ok(()) => ExitCode::Success,
            Err(e) => {
                eprintln!("error: {e:#}");
                ExitCode::Error
            }
        },
        None => {
            // Default behavior: run check with flattened args
            if cli.check.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            run_check(cli.check, &config)
        }
    };

    exit_code.into()
}

fn run_check(args: CheckArgs, config: &AppConfig) -> ExitCode {
    let args = CheckArgs::with_config(args, config);
    match commands::check::run(&args) {
        Ok(result) => {
            let tally = result.tally;
            info!(
                "Checked {} photo(s): {} valid, {} invalid, {} unreadable",
                tally.checked(),
                tally.valid,
                tally.invalid,
                tally.unreadable
            );
            result.exit_code
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
