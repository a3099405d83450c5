//! Regresor CLI
//!
//! Single-command training entry point for the regresor library.
//!
//! # Usage
//!
//! ```bash
//! # Run the full pipeline from a config
//! regresor train config.yaml
//!
//! # Validate a config without training
//! regresor validate config.yaml
//!
//! # List registered models and metrics
//! regresor info
//! ```

use clap::Parser;
use regresor::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
