//! Configuration parser: YAML document → [`ParsedConfig`]
//!
//! Each section is validated independently with a section-specific error.
//! The call either passes every check and returns the whole config, or
//! fails; no partially valid object is ever returned.

use super::schema::{ConfigPaths, ParsedConfig, RunManifest};
use super::validate::{validate_hyperparameters, HyperparameterValue};
use crate::error::{Error, Result};
use crate::model::{EstimatorRegistry, ParamGrid};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse and validate a configuration file
pub fn parse_config(path: &Path, registry: &EstimatorRegistry) -> Result<ParsedConfig> {
    let document = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Config("The specified configuration file was not found.".to_string())
        } else {
            Error::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        }
    })?;
    parse_config_str(&document, registry)
}

/// Parse and validate a configuration document
pub fn parse_config_str(document: &str, registry: &EstimatorRegistry) -> Result<ParsedConfig> {
    let manifest: RunManifest = serde_yaml::from_str(document).map_err(|e| {
        Error::Config(format!("There was an error parsing the configuration file: {e}"))
    })?;

    let paths = parse_paths(&manifest)?;
    let model_name = parse_model_name(&manifest)?;
    let cv = parse_cv(&manifest)?;
    let evaluation_metrics = parse_evaluation_metrics(&manifest)?;
    let param_grid = parse_param_grid(&manifest, &model_name, registry)?;

    Ok(ParsedConfig {
        paths,
        model_name,
        cv,
        evaluation_metrics,
        param_grid,
    })
}

/// Empty or whitespace-only path entries count as unset
fn optional_path(entry: &Option<String>) -> Option<PathBuf> {
    entry
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
}

fn parse_paths(manifest: &RunManifest) -> Result<ConfigPaths> {
    let section = &manifest.paths;
    let data_ingestion_source = section
        .data_ingestion_source
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::Config(
                "The 'data_ingestion_source' must be specified in the 'paths' section of the \
                 config file."
                    .to_string(),
            )
        })?
        .to_string();

    Ok(ConfigPaths {
        training_data: optional_path(&section.training_data),
        training_labels: optional_path(&section.training_labels),
        testing_data: optional_path(&section.testing_data),
        testing_labels: optional_path(&section.testing_labels),
        results: optional_path(&section.results),
        transformation_logic_path: optional_path(&section.transformation_logic_path),
        data_ingestion_source,
    })
}

/// Exactly one non-blank `model_name` entry must survive
///
/// Blank entries represent commented-out choices and are skipped; "none
/// selected" and "multiple selected" are reported distinctly.
fn parse_model_name(manifest: &RunManifest) -> Result<String> {
    let selected: Vec<&str> = manifest
        .model_config
        .model_name
        .iter()
        .filter_map(|entry| entry.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect();

    match selected.as_slice() {
        [] => Err(Error::Config(
            "No model selected. Please uncomment one model in the 'model_name' section."
                .to_string(),
        )),
        [name] => Ok((*name).to_string()),
        _ => Err(Error::Config(
            "Multiple models selected. Please select only one model in the 'model_name' section."
                .to_string(),
        )),
    }
}

fn parse_cv(manifest: &RunManifest) -> Result<usize> {
    let cv = manifest
        .model_config
        .cv
        .as_ref()
        .and_then(serde_yaml::Value::as_i64)
        .filter(|v| *v >= 1)
        .ok_or_else(|| {
            Error::Config("'cv' must be a positive integer starting from 1.".to_string())
        })?;
    Ok(cv as usize)
}

fn parse_evaluation_metrics(manifest: &RunManifest) -> Result<Vec<String>> {
    let items = manifest
        .model_config
        .evaluation_metric
        .as_ref()
        .and_then(serde_yaml::Value::as_sequence)
        .filter(|seq| !seq.is_empty())
        .ok_or_else(|| {
            Error::Config(
                "The 'evaluation_metric' must be a non-empty list of strings.".to_string(),
            )
        })?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    Error::Config(
                        "Each item in 'evaluation_metric' must be a non-empty string."
                            .to_string(),
                    )
                })
        })
        .collect()
}

/// Validate the selected model's hyperparameters and normalize them into a
/// uniformly sequence-valued grid
fn parse_param_grid(
    manifest: &RunManifest,
    model_name: &str,
    registry: &EstimatorRegistry,
) -> Result<ParamGrid> {
    let raw = manifest
        .model_config
        .model_hyperparameters
        .get(model_name)
        .cloned()
        .unwrap_or_default();

    let mut hyperparameters: BTreeMap<String, HyperparameterValue> = BTreeMap::new();
    for (param, value) in &raw {
        hyperparameters.insert(param.clone(), HyperparameterValue::from_yaml(param, value)?);
    }

    // Always runs, so an unresolvable model name fails here even when no
    // hyperparameters were supplied
    validate_hyperparameters(registry, model_name, &hyperparameters)?;

    Ok(hyperparameters
        .into_iter()
        .map(|(param, value)| (param, value.into_candidates()))
        .collect())
}
