//! dm-validate CLI
//!
//! Command-line interface for the Digital Marketplace answer validator.
//!
//! # Usage
//!
//! ```bash
//! # Validate answers for a service, storing uploads beneath ./documents
//! dm-validate validate --content manifest.yml --answers answers.json \
//!     --service service.json --store-dir ./documents
//!
//! # Check a manifest for unknown rules
//! dm-validate check-content --content manifest.yml
//! ```
//!
//! # Exit Codes
//!
//! - 0: Success - every answer is valid
//! - 1: At least one answer was rejected
//! - 3: Invalid input or arguments
//! - 4: File not found or inaccessible
//! - 5: Content or configuration errors
//! - 10: Internal error

use clap::Parser;
use dmutils_validation::{run_cli, LogFormat, ValidateCli, ValidatorConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn log_level(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn main() {
    let cli = ValidateCli::parse();

    let log_format = cli
        .log_format
        .or_else(|| ValidatorConfig::from_env().ok().map(|c| c.log_format))
        .unwrap_or_default();
    let filter = EnvFilter::from_default_env().add_directive(log_level(cli.verbose, cli.quiet).into());

    // Logs go to stderr so reports on stdout stay machine-readable
    match log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
    }

    let exit_code = run_cli(cli);
    std::process::exit(exit_code.into());
}
