//! Info command implementation

use crate::cli::logging::log;
use crate::cli::{InfoArgs, LogLevel};
use crate::eval::supported_names;
use crate::model::EstimatorRegistry;

pub fn run_info(_args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let registry = EstimatorRegistry::with_builtin();

    log(level, LogLevel::Normal, "Registered models:");
    for name in registry.names() {
        println!("  {name}");
    }

    println!();
    log(level, LogLevel::Normal, "Supported evaluation metrics:");
    for name in supported_names() {
        println!("  {name}");
    }

    Ok(())
}
