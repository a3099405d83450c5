//! CLI module: argument definitions and command handlers

mod commands;
mod logging;

pub use commands::run_command;
pub use logging::LogLevel;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Regresor: configuration-driven regression training
#[derive(Parser, Debug, Clone)]
#[command(name = "regresor")]
#[command(version)]
#[command(about = "Train, search and evaluate regression models from a YAML configuration")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the full train/evaluate/persist pipeline from a configuration
    Train(TrainArgs),

    /// Validate a configuration file without training
    Validate(ValidateArgs),

    /// List registered models and supported metrics
    Info(InfoArgs),
}

/// Arguments for the train command
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to the YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {}
