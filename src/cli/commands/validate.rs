//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, ValidateArgs};
use crate::config::{parse_config, ParsedConfig};
use crate::model::EstimatorRegistry;
use crate::train::combinations;

/// Print a short summary of the validated configuration
fn print_summary(config: &ParsedConfig) {
    println!();
    println!("Configuration Summary:");
    println!("  Model: {}", config.model_name);
    println!("  CV folds: {}", config.cv);
    println!("  Metrics: {}", config.evaluation_metrics.join(", "));
    println!("  Ingestion source: {}", config.paths.data_ingestion_source);
    if config.param_grid.is_empty() {
        println!("  Hyperparameters: defaults");
    } else {
        println!(
            "  Hyperparameter grid: {} parameter(s), {} combination(s)",
            config.param_grid.len(),
            combinations(&config.param_grid).len()
        );
    }
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let registry = EstimatorRegistry::with_builtin();
    let config = parse_config(&args.config, &registry).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if level != LogLevel::Quiet {
        print_summary(&config);
    }

    Ok(())
}
