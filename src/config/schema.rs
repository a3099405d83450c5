//! Run manifest schema and the validated configuration value
//!
//! [`RunManifest`] mirrors the YAML document as written; [`ParsedConfig`] is
//! the immutable value the parser produces once every check has passed.
//! Downstream components only ever see the latter.

use crate::model::ParamGrid;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Raw declarative document, prior to validation
///
/// Unknown top-level keys are ignored for forward compatibility.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunManifest {
    #[serde(default)]
    pub paths: PathsSection,
    #[serde(default)]
    pub model_config: ModelSection,
}

/// `paths.*` section
///
/// Only `data_ingestion_source` is mandatory; every other entry may be
/// omitted and resolved later from dataset-name-derived conventional
/// filenames.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsSection {
    #[serde(default)]
    pub training_data: Option<String>,
    #[serde(default)]
    pub training_labels: Option<String>,
    #[serde(default)]
    pub testing_data: Option<String>,
    #[serde(default)]
    pub testing_labels: Option<String>,
    #[serde(default)]
    pub results: Option<String>,
    #[serde(default)]
    pub transformation_logic_path: Option<String>,
    #[serde(default)]
    pub data_ingestion_source: Option<String>,
}

/// `model_config.*` section
///
/// `cv` and `evaluation_metric` stay untyped here so the parser can report
/// section-specific errors instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelSection {
    /// Model selections; blank entries represent commented-out choices
    #[serde(default)]
    pub model_name: Vec<Option<String>>,
    #[serde(default)]
    pub cv: Option<serde_yaml::Value>,
    #[serde(default)]
    pub evaluation_metric: Option<serde_yaml::Value>,
    /// Per-model hyperparameter assignments; scalar or list-valued cells
    #[serde(default)]
    pub model_hyperparameters: BTreeMap<String, BTreeMap<String, serde_yaml::Value>>,
}

/// Filesystem roles extracted from `paths.*`
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigPaths {
    pub training_data: Option<PathBuf>,
    pub training_labels: Option<PathBuf>,
    pub testing_data: Option<PathBuf>,
    pub testing_labels: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub transformation_logic_path: Option<PathBuf>,
    /// Source identifier for the ingestion collaborator; always non-empty
    pub data_ingestion_source: String,
}

/// Validated, immutable configuration for one run
///
/// Either every check passed and the whole value is usable, or parsing
/// failed; no partially valid config is ever constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConfig {
    pub paths: ConfigPaths,
    /// The single selected model name, resolved against the registry
    pub model_name: String,
    /// Cross-validation fold count, at least 1
    pub cv: usize,
    /// Requested reporting metrics; index 0 drives search optimization
    pub evaluation_metrics: Vec<String>,
    /// Validated, uniformly list-valued hyperparameter grid
    pub param_grid: ParamGrid,
}
