//! Durable persistence of run artifacts
//!
//! Each artifact is written independently to its own location keyed by model
//! name; writes are not transactional, so a failure mid-sequence leaves a
//! partially written results directory behind.

use crate::error::{Error, Result};
use crate::eval::EvaluationResult;
use crate::model::{ModelArtifact, ParamMap};
use crate::train::CvResults;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Append-only record of one completed run, written once and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub model_name: String,
    pub evaluation_metrics: Vec<String>,
    pub best_params: Option<ParamMap>,
    pub metrics: EvaluationResult,
    /// ISO-8601 timestamp taken at write time
    pub timestamp: String,
}

/// Create the uniquely timestamped results directory for one run
///
/// Layout: `{root}/{model_name}/{metrics_joined_by_underscore}/{timestamp}`,
/// with `results` as the default root. Created once per run; concurrent runs
/// therefore never share a directory.
pub fn create_results_directory(
    root: Option<&Path>,
    model_name: &str,
    evaluation_metrics: &[String],
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let metrics_str = evaluation_metrics.join("_");
    let dir = root
        .unwrap_or_else(|| Path::new("results"))
        .join(model_name)
        .join(metrics_str)
        .join(timestamp);
    fs::create_dir_all(&dir).map_err(|e| {
        Error::FileHandling(format!(
            "could not create results directory {}: {e}",
            dir.display()
        ))
    })?;
    Ok(dir)
}

/// Serialize a value as pretty JSON at `path`, overwriting any previous file
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| Error::FileHandling(format!("JSON serialization failed: {e}")))?;
    fs::write(path, json)
        .map_err(|e| Error::FileHandling(format!("could not write {}: {e}", path.display())))
}

/// Persist the four run artifacts, each keyed by model name
///
/// `cv_results` and `best_params` are simply omitted when absent; their
/// absence is not an error.
pub fn persist_artifacts(
    results_dir: &Path,
    model_name: &str,
    metrics: &EvaluationResult,
    cv_results: Option<&CvResults>,
    best_params: Option<&ParamMap>,
    model: &ModelArtifact,
) -> Result<()> {
    write_json(
        &results_dir.join(format!("{model_name}_metrics.json")),
        metrics,
    )?;

    if let Some(cv_results) = cv_results {
        write_json(
            &results_dir.join(format!("{model_name}_cv_results.json")),
            cv_results,
        )?;
    }

    if let Some(best_params) = best_params {
        write_json(
            &results_dir.join(format!("{model_name}_best_params.json")),
            best_params,
        )?;
    }

    write_json(
        &results_dir.join(format!("{model_name}_best_model.json")),
        model,
    )
}

/// Write the human-readable run summary
///
/// Overwrites rather than appends, so repeating the call within the same
/// run directory is safe.
pub fn save_run_summary(
    results_dir: &Path,
    model_name: &str,
    evaluation_metrics: &[String],
    best_params: Option<&ParamMap>,
    metrics: &EvaluationResult,
) -> Result<()> {
    let summary = RunSummary {
        model_name: model_name.to_string(),
        evaluation_metrics: evaluation_metrics.to_vec(),
        best_params: best_params.cloned(),
        metrics: metrics.clone(),
        timestamp: Local::now().to_rfc3339(),
    };
    write_json(&results_dir.join("run_summary.json"), &summary)
}
