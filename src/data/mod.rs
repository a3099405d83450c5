//! Loading of prepared dataset artifacts
//!
//! The ingestion and transformation collaborators leave conventionally named
//! numeric CSV files behind; this module resolves which files a run should
//! read and loads them into matrices. Explicit `paths.*` entries always win;
//! unset entries fall back to filenames derived from the transformation
//! logic's dataset name.

use crate::config::ParsedConfig;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};
use std::path::{Path, PathBuf};

/// Default directory the transformation collaborator writes into
const CLEAN_DATA_DIR: &str = "cleanDatasets";

/// Resolved locations of the four prepared artifacts
#[derive(Debug, Clone, PartialEq)]
pub struct DataPaths {
    pub training_data: PathBuf,
    pub training_labels: PathBuf,
    pub testing_data: PathBuf,
    pub testing_labels: PathBuf,
}

/// Resolve the prepared-artifact locations for a run
///
/// Every conventional fallback requires a dataset name derived from
/// `transformation_logic_path`, and the fallback file must already exist;
/// explicitly configured paths are taken as-is.
pub fn resolve_data_paths(config: &ParsedConfig) -> Result<DataPaths> {
    let dataset_name = config
        .paths
        .transformation_logic_path
        .as_deref()
        .and_then(Path::file_stem)
        .and_then(|s| s.to_str())
        .map(str::to_string);

    Ok(DataPaths {
        training_data: resolve_entry(
            config.paths.training_data.as_deref(),
            dataset_name.as_deref(),
            "prepared",
        )?,
        training_labels: resolve_entry(
            config.paths.training_labels.as_deref(),
            dataset_name.as_deref(),
            "labels",
        )?,
        testing_data: resolve_entry(
            config.paths.testing_data.as_deref(),
            dataset_name.as_deref(),
            "test",
        )?,
        testing_labels: resolve_entry(
            config.paths.testing_labels.as_deref(),
            dataset_name.as_deref(),
            "test_labels",
        )?,
    })
}

fn resolve_entry(
    explicit: Option<&Path>,
    dataset_name: Option<&str>,
    suffix: &str,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let dataset = dataset_name.ok_or_else(|| {
        Error::Config(format!(
            "no explicit path for the '{suffix}' artifact and no \
             'transformation_logic_path' to derive a conventional filename from"
        ))
    })?;
    let fallback = Path::new(CLEAN_DATA_DIR).join(format!("{dataset}_{suffix}.csv"));
    if !fallback.exists() {
        return Err(Error::FileHandling(format!(
            "expected prepared artifact '{}' does not exist",
            fallback.display()
        )));
    }
    Ok(fallback)
}

/// Load a numeric feature matrix from CSV
///
/// Every row must have the same width and every cell must parse as a float.
pub fn load_matrix(path: &Path, has_headers: bool) -> Result<Array2<f64>> {
    let rows = read_numeric_rows(path, has_headers)?;
    let n_rows = rows.len();
    if n_rows == 0 {
        return Err(Error::DataValidation(format!(
            "{} contains no data rows",
            path.display()
        )));
    }
    let n_cols = rows[0].len();
    if let Some(bad) = rows.iter().position(|r| r.len() != n_cols) {
        return Err(Error::DataValidation(format!(
            "{}: row {} has {} columns, expected {n_cols}",
            path.display(),
            bad + 1,
            rows[bad].len()
        )));
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((n_rows, n_cols), flat).map_err(|e| {
        Error::DataValidation(format!("{}: invalid matrix shape: {e}", path.display()))
    })
}

/// Load a label vector from CSV, flattening row-major like a raveled frame
pub fn load_labels(path: &Path, has_headers: bool) -> Result<Array1<f64>> {
    let rows = read_numeric_rows(path, has_headers)?;
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    if flat.is_empty() {
        return Err(Error::DataValidation(format!(
            "{} contains no label values",
            path.display()
        )));
    }
    Ok(Array1::from_vec(flat))
}

fn read_numeric_rows(path: &Path, has_headers: bool) -> Result<Vec<Vec<f64>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .from_path(path)
        .map_err(|e| {
            Error::FileHandling(format!("could not open {}: {e}", path.display()))
        })?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::DataValidation(format!("{}: malformed CSV record: {e}", path.display()))
        })?;
        let row = record
            .iter()
            .map(|cell| {
                cell.trim().parse::<f64>().map_err(|_| {
                    Error::DataValidation(format!(
                        "{}: non-numeric value '{}' at row {}",
                        path.display(),
                        cell,
                        line + 1
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_matrix_without_headers() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("prepared.csv");
        fs::write(&path, "1.0,2.0\n3.0,4.0\n").expect("write");

        let matrix = load_matrix(&path, false).expect("load");
        assert_eq!(matrix.shape(), &[2, 2]);
        assert_abs_diff_eq!(matrix[[1, 0]], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_load_matrix_with_headers_skips_first_row() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("test.csv");
        fs::write(&path, "a,b\n1.0,2.0\n").expect("write");

        let matrix = load_matrix(&path, true).expect("load");
        assert_eq!(matrix.shape(), &[1, 2]);
    }

    #[test]
    fn test_load_matrix_rejects_non_numeric_cell() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("bad.csv");
        fs::write(&path, "1.0,x\n").expect("write");

        let err = load_matrix(&path, false).unwrap_err();
        assert!(matches!(err, Error::DataValidation(_)));
        assert!(err.to_string().contains("non-numeric value 'x'"));
    }

    #[test]
    fn test_load_matrix_rejects_empty_file() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("empty.csv");
        fs::write(&path, "").expect("write");
        assert!(load_matrix(&path, false).is_err());
    }

    #[test]
    fn test_load_labels_flattens_rows() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("labels.csv");
        fs::write(&path, "1.0\n2.0\n3.0\n").expect("write");

        let labels = load_labels(&path, false).expect("load");
        assert_eq!(labels.len(), 3);
        assert_abs_diff_eq!(labels[2], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_file_is_file_handling_error() {
        let err = load_matrix(Path::new("/nonexistent/data.csv"), false).unwrap_err();
        assert!(matches!(err, Error::FileHandling(_)));
    }

    #[test]
    fn test_resolve_prefers_explicit_paths() {
        use crate::config::parse_config_str;
        use crate::model::EstimatorRegistry;

        let doc = r#"
paths:
  data_ingestion_source: "src"
  training_data: "explicit/train.csv"
  training_labels: "explicit/labels.csv"
  testing_data: "explicit/test.csv"
  testing_labels: "explicit/test_labels.csv"
model_config:
  model_name: [LinearRegression]
  cv: 1
  evaluation_metric: [MAE]
"#;
        let config =
            parse_config_str(doc, &EstimatorRegistry::with_builtin()).expect("parse");
        let paths = resolve_data_paths(&config).expect("resolve");
        assert_eq!(paths.training_data, PathBuf::from("explicit/train.csv"));
    }

    #[test]
    fn test_resolve_without_any_source_fails() {
        use crate::config::parse_config_str;
        use crate::model::EstimatorRegistry;

        // No explicit paths and no transformation_logic_path to derive from
        let doc = r#"
paths:
  data_ingestion_source: "src"
model_config:
  model_name: [LinearRegression]
  cv: 1
  evaluation_metric: [MAE]
"#;
        let config =
            parse_config_str(doc, &EstimatorRegistry::with_builtin()).expect("parse");
        assert!(resolve_data_paths(&config).is_err());
    }
}
