//! Train command implementation
//!
//! Wires the whole pipeline together: parse the config, load the prepared
//! artifacts, train (with grid search when cv > 1), evaluate on the test
//! set, and persist every artifact plus the run summary.

use crate::cli::logging::log;
use crate::cli::{LogLevel, TrainArgs};
use crate::config::parse_config;
use crate::data::{load_labels, load_matrix, resolve_data_paths};
use crate::eval::evaluate_model;
use crate::model::EstimatorRegistry;
use crate::report::{create_results_directory, persist_artifacts, save_run_summary};
use crate::train::train_model;

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Regresor: training from {}", args.config.display()),
    );

    let registry = EstimatorRegistry::with_builtin();
    let config = parse_config(&args.config, &registry).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "✓ Config loaded and validated");
    log(
        level,
        LogLevel::Verbose,
        &format!("  Model: {}", config.model_name),
    );
    log(level, LogLevel::Verbose, &format!("  CV folds: {}", config.cv));
    log(
        level,
        LogLevel::Verbose,
        &format!("  Metrics: {}", config.evaluation_metrics.join(", ")),
    );

    let data_paths = resolve_data_paths(&config).map_err(|e| format!("Data error: {e}"))?;

    // Prepared training artifacts carry no header row; the test-set frames do
    let x_train =
        load_matrix(&data_paths.training_data, false).map_err(|e| format!("Data error: {e}"))?;
    let y_train =
        load_labels(&data_paths.training_labels, false).map_err(|e| format!("Data error: {e}"))?;
    let x_test =
        load_matrix(&data_paths.testing_data, true).map_err(|e| format!("Data error: {e}"))?;
    let y_test =
        load_labels(&data_paths.testing_labels, true).map_err(|e| format!("Data error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "✓ Data loaded: {} training rows, {} test rows",
            x_train.nrows(),
            x_test.nrows()
        ),
    );

    let model = registry
        .resolve(&config.model_name)
        .map_err(|e| format!("Config error: {e}"))?
        .instantiate();

    let results_dir = create_results_directory(
        config.paths.results.as_deref(),
        &config.model_name,
        &config.evaluation_metrics,
    )
    .map_err(|e| format!("Persistence error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!(
            "Starting training for {}... This may take a while.",
            config.model_name
        ),
    );

    let result = train_model(
        &config.model_name,
        model,
        &x_train,
        &y_train,
        &config.param_grid,
        config.cv,
        &config.evaluation_metrics,
    )
    .map_err(|e| format!("Training error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("✓ Training for {} completed", config.model_name),
    );

    let metrics = evaluate_model(
        result.best_model.as_ref(),
        &x_test,
        &y_test,
        &config.evaluation_metrics,
    )
    .map_err(|e| format!("Evaluation error: {e}"))?;

    let artifact = result
        .best_model
        .artifact()
        .map_err(|e| format!("Persistence error: {e}"))?;
    persist_artifacts(
        &results_dir,
        &config.model_name,
        &metrics,
        result.cv_results.as_ref(),
        Some(&result.best_params),
        &artifact,
    )
    .map_err(|e| format!("Persistence error: {e}"))?;
    save_run_summary(
        &results_dir,
        &config.model_name,
        &config.evaluation_metrics,
        Some(&result.best_params),
        &metrics,
    )
    .map_err(|e| format!("Persistence error: {e}"))?;

    log(
        level,
        LogLevel::Normal,
        &format!("✓ Results written to {}", results_dir.display()),
    );
    for (name, value) in &metrics {
        println!("  {name}: {value:.6}");
    }

    Ok(())
}
